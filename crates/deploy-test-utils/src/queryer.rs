//! [`StaticResourceQueryer`] in-memory cloud inventory.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use deploy_core::query::{
    BeanstalkApplication, BeanstalkEnvironment, CloudResource, InstanceTypeInfo, QueryResult,
    ResourceQueryError, ResourceQueryer, SecurityGroup, Subnet, Vpc,
};

/// A [`ResourceQueryer`] answering from a fixed inventory.
///
/// Every call is counted. [`fail_queries`](Self::fail_queries) makes every
/// call return a [`ResourceQueryError`], and [`with_delay`](Self::with_delay)
/// delays every answer (useful for cancellation tests).
#[derive(Default)]
pub struct StaticResourceQueryer {
    resources: Vec<CloudResource>,
    applications: Vec<BeanstalkApplication>,
    environments: Vec<BeanstalkEnvironment>,
    vpcs: Vec<Vpc>,
    subnets: Vec<Subnet>,
    security_groups: Vec<SecurityGroup>,
    instance_types: Vec<String>,
    delay: Option<Duration>,
    fail: AtomicBool,
    calls: AtomicUsize,
}

impl StaticResourceQueryer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource(mut self, type_name: &str, identifier: &str) -> Self {
        self.resources.push(CloudResource {
            type_name: type_name.to_string(),
            identifier: identifier.to_string(),
        });
        self
    }

    pub fn with_beanstalk_application(mut self, name: &str) -> Self {
        self.applications.push(BeanstalkApplication {
            application_name: name.to_string(),
        });
        self
    }

    pub fn with_beanstalk_environment(mut self, application: &str, name: &str) -> Self {
        self.environments.push(BeanstalkEnvironment {
            environment_name: name.to_string(),
            application_name: application.to_string(),
        });
        self
    }

    pub fn with_vpc(mut self, vpc_id: &str, is_default: bool) -> Self {
        self.vpcs.push(Vpc {
            vpc_id: vpc_id.to_string(),
            is_default,
        });
        self
    }

    pub fn with_subnet(mut self, vpc_id: &str, subnet_id: &str, availability_zone_id: &str) -> Self {
        self.subnets.push(Subnet {
            subnet_id: subnet_id.to_string(),
            vpc_id: vpc_id.to_string(),
            availability_zone_id: availability_zone_id.to_string(),
        });
        self
    }

    pub fn with_security_group(mut self, vpc_id: &str, group_id: &str) -> Self {
        self.security_groups.push(SecurityGroup {
            group_id: group_id.to_string(),
            vpc_id: vpc_id.to_string(),
        });
        self
    }

    pub fn with_instance_type(mut self, instance_type: &str) -> Self {
        self.instance_types.push(instance_type.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Make every subsequent query fail.
    pub fn fail_queries(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Number of queries answered or failed so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn enter(&self, operation: &str) -> QueryResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(ResourceQueryError::new(operation, "simulated failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl ResourceQueryer for StaticResourceQueryer {
    async fn get_cloud_control_resource(
        &self,
        type_name: &str,
        identifier: &str,
    ) -> QueryResult<Option<CloudResource>> {
        self.enter("GetResource").await?;
        Ok(self
            .resources
            .iter()
            .find(|r| r.type_name == type_name && r.identifier == identifier)
            .cloned())
    }

    async fn list_elastic_beanstalk_applications(
        &self,
        application_name: Option<&str>,
    ) -> QueryResult<Vec<BeanstalkApplication>> {
        self.enter("DescribeApplications").await?;
        Ok(self
            .applications
            .iter()
            .filter(|a| application_name.is_none_or(|name| a.application_name == name))
            .cloned()
            .collect())
    }

    async fn list_elastic_beanstalk_environments(
        &self,
        environment_name: Option<&str>,
    ) -> QueryResult<Vec<BeanstalkEnvironment>> {
        self.enter("DescribeEnvironments").await?;
        Ok(self
            .environments
            .iter()
            .filter(|e| environment_name.is_none_or(|name| e.environment_name == name))
            .cloned()
            .collect())
    }

    async fn get_default_vpc(&self) -> QueryResult<Option<Vpc>> {
        self.enter("DescribeVpcs").await?;
        Ok(self.vpcs.iter().find(|v| v.is_default).cloned())
    }

    async fn list_vpcs(&self) -> QueryResult<Vec<Vpc>> {
        self.enter("DescribeVpcs").await?;
        Ok(self.vpcs.clone())
    }

    async fn describe_subnets(&self, vpc_id: &str) -> QueryResult<Vec<Subnet>> {
        self.enter("DescribeSubnets").await?;
        Ok(self
            .subnets
            .iter()
            .filter(|s| s.vpc_id == vpc_id)
            .cloned()
            .collect())
    }

    async fn describe_security_groups(&self, vpc_id: &str) -> QueryResult<Vec<SecurityGroup>> {
        self.enter("DescribeSecurityGroups").await?;
        Ok(self
            .security_groups
            .iter()
            .filter(|g| g.vpc_id == vpc_id)
            .cloned()
            .collect())
    }

    async fn describe_instance_type(
        &self,
        instance_type: &str,
    ) -> QueryResult<Option<InstanceTypeInfo>> {
        self.enter("DescribeInstanceTypes").await?;
        Ok(self
            .instance_types
            .iter()
            .find(|t| t.as_str() == instance_type)
            .map(|t| InstanceTypeInfo {
                instance_type: t.clone(),
            }))
    }
}
