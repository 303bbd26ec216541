//! Resource queryer for sessions without cloud access

use async_trait::async_trait;
use deploy_core::query::{
    BeanstalkApplication, BeanstalkEnvironment, CloudResource, InstanceTypeInfo, QueryResult,
    ResourceQueryError, ResourceQueryer, SecurityGroup, Subnet, Vpc,
};

const OFFLINE: &str = "cloud inventory is not available to the command-line tool";

/// A [`ResourceQueryer`] whose every query fails.
///
/// Cloud-backed validators therefore abort the command instead of passing a
/// value nobody checked.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineResourceQueryer;

fn offline<T>(operation: &str) -> QueryResult<T> {
    tracing::debug!(operation, "Refusing offline resource query");
    Err(ResourceQueryError::new(operation, OFFLINE))
}

#[async_trait]
impl ResourceQueryer for OfflineResourceQueryer {
    async fn get_cloud_control_resource(
        &self,
        _type_name: &str,
        _identifier: &str,
    ) -> QueryResult<Option<CloudResource>> {
        offline("GetResource")
    }

    async fn list_elastic_beanstalk_applications(
        &self,
        _application_name: Option<&str>,
    ) -> QueryResult<Vec<BeanstalkApplication>> {
        offline("DescribeApplications")
    }

    async fn list_elastic_beanstalk_environments(
        &self,
        _environment_name: Option<&str>,
    ) -> QueryResult<Vec<BeanstalkEnvironment>> {
        offline("DescribeEnvironments")
    }

    async fn get_default_vpc(&self) -> QueryResult<Option<Vpc>> {
        offline("DescribeVpcs")
    }

    async fn list_vpcs(&self) -> QueryResult<Vec<Vpc>> {
        offline("DescribeVpcs")
    }

    async fn describe_subnets(&self, _vpc_id: &str) -> QueryResult<Vec<Subnet>> {
        offline("DescribeSubnets")
    }

    async fn describe_security_groups(&self, _vpc_id: &str) -> QueryResult<Vec<SecurityGroup>> {
        offline("DescribeSecurityGroups")
    }

    async fn describe_instance_type(
        &self,
        _instance_type: &str,
    ) -> QueryResult<Option<InstanceTypeInfo>> {
        offline("DescribeInstanceTypes")
    }
}
