//! Facts about the destination environment of a deployment session

use deploy_meta::DeploymentType;
use serde::{Deserialize, Serialize};

/// Session facts consumed by rule evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionFacts {
    pub region: Option<String>,
    pub account_id: Option<String>,
    /// Whether a container engine is available for local image builds
    pub docker_available: bool,
    /// Deployment types the current front-end can run; `None` allows all
    pub supported_deployment_types: Option<Vec<DeploymentType>>,
}

impl SessionFacts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_supported_deployment_types(mut self, types: Vec<DeploymentType>) -> Self {
        self.supported_deployment_types = Some(types);
        self
    }

    pub fn supports(&self, deployment_type: DeploymentType) -> bool {
        self.supported_deployment_types
            .as_ref()
            .is_none_or(|types| types.contains(&deployment_type))
    }
}
