//! [`TestProject`] temporary project directory.

use std::fs;
use std::path::{Path, PathBuf};

use deploy_meta::ProjectDefinition;
use tempfile::TempDir;

/// A temporary directory holding a project file and, optionally, other files
/// rule tests and validators look for.
///
/// # Example
///
/// ```rust
/// use deploy_test_utils::TestProject;
///
/// let project = TestProject::web("Orders").with_file("Dockerfile", "FROM scratch");
/// assert!(project.root().join("Dockerfile").is_file());
/// assert_eq!(project.definition().project_name(), "Orders");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
    definition: ProjectDefinition,
}

impl TestProject {
    /// A project named `name` with the given SDK.
    pub fn new(name: &str, sdk: &str) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let project_file = temp_dir.path().join(format!("{name}.csproj"));
        fs::write(
            &project_file,
            format!("<Project Sdk=\"{sdk}\"></Project>\n"),
        )
        .unwrap();

        let definition = ProjectDefinition::new(project_file).with_sdk_type(sdk);
        Self {
            temp_dir,
            definition,
        }
    }

    /// An ASP.NET Core web project.
    pub fn web(name: &str) -> Self {
        Self::new(name, "Microsoft.NET.Sdk.Web")
    }

    /// Write a file relative to the project directory. A file named
    /// `Dockerfile` also sets the docker-file fact.
    pub fn with_file(mut self, relative_path: &str, content: &str) -> Self {
        let path = self.root().join(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        if relative_path == "Dockerfile" {
            self.definition.has_docker_file = true;
        }
        self
    }

    pub fn with_dir(self, relative_path: &str) -> Self {
        fs::create_dir_all(self.root().join(relative_path)).unwrap();
        self
    }

    pub fn with_property(mut self, name: &str, value: &str) -> Self {
        self.definition = self.definition.with_property(name, value);
        self
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn definition(&self) -> &ProjectDefinition {
        &self.definition
    }

    /// Serialize the project facts to `facts.json` and return its path.
    pub fn write_facts(&self) -> PathBuf {
        let path = self.root().join("facts.json");
        fs::write(&path, serde_json::to_string_pretty(&self.definition).unwrap()).unwrap();
        path
    }
}
