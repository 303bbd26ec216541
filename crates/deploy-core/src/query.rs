//! Cloud inventory lookups consumed by validators
//!
//! Implementations wrap a cloud SDK; this crate only defines the seam.
//! A lookup that finds nothing returns `Ok(None)` or an empty list. `Err` is
//! reserved for a query that could not be answered (throttling, missing
//! credentials, network failure) and must never be read as "not found".

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result type for resource queries
pub type QueryResult<T> = std::result::Result<T, ResourceQueryError>;

/// A cloud inventory query that could not be answered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Resource query '{operation}' failed: {message}")]
pub struct ResourceQueryError {
    pub operation: String,
    pub message: String,
}

impl ResourceQueryError {
    pub fn new(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudResource {
    pub type_name: String,
    pub identifier: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeanstalkApplication {
    pub application_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeanstalkEnvironment {
    pub environment_name: String,
    pub application_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vpc {
    pub vpc_id: String,
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subnet {
    pub subnet_id: String,
    pub vpc_id: String,
    pub availability_zone_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroup {
    pub group_id: String,
    pub vpc_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceTypeInfo {
    pub instance_type: String,
}

/// Asynchronous cloud inventory lookups.
///
/// Timeouts and retries belong to the implementation.
#[async_trait]
pub trait ResourceQueryer: Send + Sync {
    /// Look up a resource by Cloud Control type name and identifier.
    async fn get_cloud_control_resource(
        &self,
        type_name: &str,
        identifier: &str,
    ) -> QueryResult<Option<CloudResource>>;

    /// Beanstalk applications, optionally filtered by name.
    async fn list_elastic_beanstalk_applications(
        &self,
        application_name: Option<&str>,
    ) -> QueryResult<Vec<BeanstalkApplication>>;

    /// Beanstalk environments, optionally filtered by name.
    async fn list_elastic_beanstalk_environments(
        &self,
        environment_name: Option<&str>,
    ) -> QueryResult<Vec<BeanstalkEnvironment>>;

    async fn get_default_vpc(&self) -> QueryResult<Option<Vpc>>;

    async fn list_vpcs(&self) -> QueryResult<Vec<Vpc>>;

    async fn describe_subnets(&self, vpc_id: &str) -> QueryResult<Vec<Subnet>>;

    async fn describe_security_groups(&self, vpc_id: &str) -> QueryResult<Vec<SecurityGroup>>;

    /// `Ok(None)` when the instance type is not offered in the region.
    async fn describe_instance_type(
        &self,
        instance_type: &str,
    ) -> QueryResult<Option<InstanceTypeInfo>>;
}
