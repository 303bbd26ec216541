//! Project facts supplied by the upstream project probe

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Structured facts about a project to be deployed.
///
/// Produced by a project probe from the project's build manifest; this crate
/// only consumes the fixed shape.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectDefinition {
    /// Path to the project file (e.g. `MyApp/MyApp.csproj`)
    pub project_path: PathBuf,
    /// `Sdk` attribute of the root project element
    pub sdk_type: Option<String>,
    pub target_framework: Option<String>,
    pub assembly_name: Option<String>,
    /// Whether a Dockerfile sits next to the project file
    pub has_docker_file: bool,
    /// Build properties keyed by property name
    pub properties: BTreeMap<String, String>,
    /// Package references: package name -> version
    pub package_references: BTreeMap<String, String>,
}

impl ProjectDefinition {
    pub fn new(project_path: impl Into<PathBuf>) -> Self {
        Self {
            project_path: project_path.into(),
            ..Self::default()
        }
    }

    pub fn with_sdk_type(mut self, sdk_type: impl Into<String>) -> Self {
        self.sdk_type = Some(sdk_type.into());
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn with_package_reference(
        mut self,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        self.package_references.insert(name.into(), version.into());
        self
    }

    pub fn with_docker_file(mut self, has_docker_file: bool) -> Self {
        self.has_docker_file = has_docker_file;
        self
    }

    /// Project name: the project file name without its extension.
    pub fn project_name(&self) -> String {
        self.project_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Directory containing the project file.
    ///
    /// A path without a file extension is treated as the directory itself.
    pub fn project_directory(&self) -> &Path {
        if self.project_path.extension().is_some() {
            self.project_path.parent().unwrap_or(Path::new(""))
        } else {
            &self.project_path
        }
    }

    /// Value of a build property, if set.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    /// Referenced version of a package, if referenced.
    pub fn package_reference_version(&self, package_name: &str) -> Option<&str> {
        self.package_references
            .get(package_name)
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_name_and_directory() {
        let project = ProjectDefinition::new("/src/WebApp/WebApp.csproj");
        assert_eq!(project.project_name(), "WebApp");
        assert_eq!(project.project_directory(), Path::new("/src/WebApp"));
    }

    #[test]
    fn test_directory_path_is_its_own_directory() {
        let project = ProjectDefinition::new("/src/WebApp");
        assert_eq!(project.project_directory(), Path::new("/src/WebApp"));
    }

    #[test]
    fn test_property_and_package_lookup() {
        let project = ProjectDefinition::new("App.csproj")
            .with_property("OutputType", "Exe")
            .with_package_reference("AWSSDK.SQS", "3.7.0");

        assert_eq!(project.property("OutputType"), Some("Exe"));
        assert_eq!(project.property("TargetFramework"), None);
        assert_eq!(project.package_reference_version("AWSSDK.SQS"), Some("3.7.0"));
        assert_eq!(project.package_reference_version("Newtonsoft.Json"), None);
    }
}
