//! Cloud-backed validators against an in-memory inventory

use std::sync::Arc;

use deploy_core::Recommendation;
use deploy_test_utils::{RecipeBuilder, SettingBuilder, StaticResourceQueryer, TestProject};
use deploy_validation::ValidatorPipeline;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};

struct Harness {
    _project: TestProject,
    recommendation: Recommendation,
    pipeline: ValidatorPipeline,
}

impl Harness {
    fn new(recipe: RecipeBuilder, queryer: StaticResourceQueryer) -> Self {
        let project = TestProject::web("Orders");
        let recommendation = recipe.recommend(project.definition());
        Self {
            _project: project,
            recommendation,
            pipeline: ValidatorPipeline::new(Arc::new(queryer)),
        }
    }

    /// Failure messages for `input` proposed to `setting_id`.
    async fn failures(&self, setting_id: &str, input: Value) -> Vec<String> {
        let node = self.recommendation.tree().get(setting_id).unwrap();
        self.pipeline
            .validate_setting(&self.recommendation, node, &input)
            .await
            .unwrap()
            .into_iter()
            .filter_map(|result| result.message)
            .collect()
    }
}

fn inventory() -> StaticResourceQueryer {
    StaticResourceQueryer::new()
        .with_vpc("vpc-app", false)
        .with_vpc("vpc-default", true)
        .with_vpc("vpc-flat", false)
        .with_subnet("vpc-app", "subnet-a", "use1-az1")
        .with_subnet("vpc-app", "subnet-b", "use1-az2")
        .with_subnet("vpc-flat", "subnet-c", "use1-az1")
        .with_subnet("vpc-flat", "subnet-d", "use1-az1")
        .with_subnet("vpc-default", "subnet-z", "use1-az3")
        .with_security_group("vpc-app", "sg-1")
        .with_security_group("vpc-app", "sg-2")
        .with_security_group("vpc-default", "sg-9")
        .with_instance_type("t3.micro")
}

fn vpc_recipe() -> RecipeBuilder {
    RecipeBuilder::new("Fargate")
        .setting(SettingBuilder::bool("UseDefaultVpc").default(false))
        .setting(
            SettingBuilder::string("VpcId")
                .default("vpc-app")
                .validator("VPCSubnetsInDifferentAZs", None),
        )
        .setting(SettingBuilder::list("Subnets").validator(
            "SubnetsInVpc",
            Some(json!({ "VpcId": "VpcId", "DefaultVpcOptionPath": "UseDefaultVpc" })),
        ))
        .setting(SettingBuilder::string("SecurityGroups").validator(
            "SecurityGroupsInVpc",
            Some(json!({ "VpcId": "VpcId", "IsDefaultVpcOptionSettingId": "UseDefaultVpc" })),
        ))
        .setting(SettingBuilder::string("InstanceType").validator("InstanceType", None))
}

#[rstest]
#[case::two_zones("vpc-app", 0)]
#[case::single_subnet("vpc-default", 1)]
#[case::shared_zone("vpc-flat", 1)]
#[case::no_subnets("vpc-missing", 1)]
#[tokio::test]
async fn test_subnets_in_different_zones(#[case] vpc_id: &str, #[case] failures: usize) {
    let harness = Harness::new(vpc_recipe(), inventory());

    let messages = harness.failures("VpcId", json!(vpc_id)).await;

    assert_eq!(messages.len(), failures, "{messages:?}");
    if failures > 0 {
        assert_eq!(
            messages[0],
            "Selected VPC must have at least two subnets in two different Availability Zones."
        );
    }
}

#[tokio::test]
async fn test_subnets_in_different_zones_requires_vpc() {
    let harness = Harness::new(vpc_recipe(), inventory());

    assert_eq!(
        harness.failures("VpcId", json!("")).await,
        vec!["A VPC ID is not specified. Please select a valid VPC ID.".to_string()]
    );
}

#[tokio::test]
async fn test_subnets_must_belong_to_selected_vpc() {
    let harness = Harness::new(vpc_recipe(), inventory());

    assert!(harness.failures("Subnets", json!(["subnet-a", "subnet-b"])).await.is_empty());
    assert!(harness.failures("Subnets", json!(r#"["subnet-a"]"#)).await.is_empty());

    let messages = harness.failures("Subnets", json!(["subnet-a", "subnet-z"])).await;
    assert_eq!(
        messages,
        vec![
            "The selected subnet(s) (subnet-z) are invalid since they do not belong to the currently selected VPC vpc-app."
                .to_string()
        ]
    );
}

#[tokio::test]
async fn test_default_vpc_takes_precedence_for_subnets() {
    let mut harness = Harness::new(vpc_recipe(), inventory());
    harness.recommendation.set_override("UseDefaultVpc", json!(true));

    assert!(harness.failures("Subnets", json!(["subnet-z"])).await.is_empty());
    assert_eq!(harness.failures("Subnets", json!(["subnet-a"])).await.len(), 1);
}

#[tokio::test]
async fn test_subnets_need_a_vpc_setting() {
    let mut harness = Harness::new(vpc_recipe(), inventory());
    harness.recommendation.set_override("VpcId", json!(""));

    assert_eq!(
        harness.failures("Subnets", json!(["subnet-a"])).await,
        vec!["The VpcId setting is not set or is empty. Make sure to set the VPC Id first.".to_string()]
    );
}

#[rstest]
#[case(json!("sg-1, sg-2"), 0)]
#[case(json!(["sg-1"]), 0)]
#[case(json!(""), 0)]
#[case(json!("sg-1,sg-9"), 1)]
#[tokio::test]
async fn test_security_groups_in_vpc(#[case] input: Value, #[case] failures: usize) {
    let harness = Harness::new(vpc_recipe(), inventory());

    assert_eq!(harness.failures("SecurityGroups", input).await.len(), failures);
}

#[tokio::test]
async fn test_default_vpc_takes_precedence_for_security_groups() {
    let mut harness = Harness::new(vpc_recipe(), inventory());
    harness.recommendation.set_override("UseDefaultVpc", json!(true));

    assert!(harness.failures("SecurityGroups", json!("sg-9")).await.is_empty());
    let messages = harness.failures("SecurityGroups", json!("sg-1")).await;
    assert!(messages[0].contains("vpc-default"), "{}", messages[0]);
}

#[rstest]
#[case("t3.micro", 0)]
#[case("", 0)]
#[case("t9.colossal", 1)]
#[tokio::test]
async fn test_instance_type_offered(#[case] instance_type: &str, #[case] failures: usize) {
    let harness = Harness::new(vpc_recipe(), inventory());

    let messages = harness.failures("InstanceType", json!(instance_type)).await;

    assert_eq!(messages.len(), failures);
    if failures > 0 {
        assert_eq!(
            messages[0],
            "The specified instance type t9.colossal does not exist in the deployment region."
        );
    }
}

fn use_vpc_recipe() -> RecipeBuilder {
    RecipeBuilder::new("AppRunner").setting(
        SettingBuilder::bool("UseVpcConnector").validator(
            "VpcExists",
            Some(json!({
                "DefaultVpc": true,
                "FailValue": true,
                "ValidationFailedMessage": "A default VPC could not be found."
            })),
        ),
    )
}

#[tokio::test]
async fn test_vpc_exists_without_any_default_vpc() {
    let harness = Harness::new(use_vpc_recipe(), StaticResourceQueryer::new().with_vpc("vpc-app", false));

    assert_eq!(
        harness.failures("UseVpcConnector", json!(true)).await,
        vec!["A default VPC could not be found.".to_string()]
    );
    assert!(harness.failures("UseVpcConnector", json!(false)).await.is_empty());
    assert!(harness.failures("UseVpcConnector", json!("False")).await.is_empty());
}

#[tokio::test]
async fn test_vpc_exists_with_default_vpc() {
    let harness = Harness::new(use_vpc_recipe(), inventory());

    assert!(harness.failures("UseVpcConnector", json!(true)).await.is_empty());
}

fn beanstalk_recipe() -> RecipeBuilder {
    RecipeBuilder::new("Beanstalk")
        .setting(SettingBuilder::string("ApplicationName").validator(
            "ExistingResource",
            Some(json!({ "ResourceType": "AWS::ElasticBeanstalk::Application" })),
        ))
        .setting(SettingBuilder::string("EnvironmentName").validator(
            "ExistingResource",
            Some(json!({ "ResourceType": "AWS::ElasticBeanstalk::Environment" })),
        ))
}

#[tokio::test]
async fn test_existing_beanstalk_resources() {
    let harness = Harness::new(
        beanstalk_recipe(),
        StaticResourceQueryer::new()
            .with_beanstalk_application("orders")
            .with_beanstalk_environment("orders", "orders-dev"),
    );

    assert!(harness.failures("ApplicationName", json!("billing")).await.is_empty());
    assert!(harness.failures("EnvironmentName", json!("orders-prod")).await.is_empty());

    let messages = harness.failures("ApplicationName", json!("orders")).await;
    assert!(
        messages[0].starts_with("An Elastic Beanstalk application already exists with the name 'orders'."),
        "{}",
        messages[0]
    );
    let messages = harness.failures("EnvironmentName", json!("orders-dev")).await;
    assert!(messages[0].starts_with("An Elastic Beanstalk environment already exists"));
}

#[tokio::test]
async fn test_existing_resource_rejects_empty_name() {
    let harness = Harness::new(beanstalk_recipe(), StaticResourceQueryer::new());

    assert_eq!(
        harness.failures("ApplicationName", json!("")).await,
        vec!["The resource name is empty and cannot be validated.".to_string()]
    );
}
