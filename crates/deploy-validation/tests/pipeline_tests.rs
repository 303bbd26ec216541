//! SetValue pipeline behaviour against an in-memory cloud inventory

use std::sync::Arc;
use std::time::Duration;

use deploy_core::Recommendation;
use deploy_meta::OptionSettingValueType;
use deploy_test_utils::{RecipeBuilder, SettingBuilder, StaticResourceQueryer, TestProject};
use deploy_validation::{Error, ValidatorPipeline};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn pipeline() -> ValidatorPipeline {
    ValidatorPipeline::new(Arc::new(StaticResourceQueryer::new()))
}

fn recommend(recipe: RecipeBuilder) -> (TestProject, Recommendation) {
    let project = TestProject::web("Orders");
    let recommendation = recipe.recommend(project.definition());
    (project, recommendation)
}

fn desired_count() -> SettingBuilder {
    SettingBuilder::int("DesiredCount")
        .name("Desired Count")
        .default(3)
        .validator("Required", None)
        .validator("Range", Some(json!({ "Min": 1, "Max": 10 })))
}

fn rejected(result: deploy_validation::Result<()>) -> Vec<String> {
    match result {
        Err(Error::ValidationFailed { messages, .. }) => messages,
        Err(other) => panic!("expected a validation failure, got: {other}"),
        Ok(()) => panic!("expected a validation failure"),
    }
}

#[tokio::test]
async fn test_all_failures_reported_and_nothing_written() {
    let (_project, mut rec) = recommend(RecipeBuilder::new("Fargate").setting(desired_count()));

    let messages = rejected(pipeline().set_value(&mut rec, "DesiredCount", json!("")).await);

    assert_eq!(
        messages,
        vec![
            "The option setting 'Desired Count' can not be empty. Please select a valid value.".to_string(),
            "Value must be greater than or equal to 1 and less than or equal to 10".to_string(),
        ]
    );
    assert_eq!(rec.override_value("DesiredCount"), None);
    assert_eq!(rec.get_value_by_id("DesiredCount").unwrap(), json!(3));
}

#[tokio::test]
async fn test_valid_text_is_coerced_to_setting_type() {
    let (_project, mut rec) = recommend(
        RecipeBuilder::new("Fargate")
            .setting(desired_count())
            .setting(SettingBuilder::bool("UseSpot"))
            .setting(SettingBuilder::double("CpuThreshold")),
    );
    let pipeline = pipeline();

    pipeline.set_value(&mut rec, "DesiredCount", json!("5")).await.unwrap();
    pipeline.set_value(&mut rec, "UseSpot", json!("True")).await.unwrap();
    pipeline.set_value(&mut rec, "CpuThreshold", json!("0.75")).await.unwrap();

    assert_eq!(rec.override_value("DesiredCount"), Some(&json!(5)));
    assert_eq!(rec.override_value("UseSpot"), Some(&json!(true)));
    assert_eq!(rec.override_value("CpuThreshold"), Some(&json!(0.75)));
}

#[tokio::test]
async fn test_uncoercible_text_is_rejected() {
    let (_project, mut rec) = recommend(RecipeBuilder::new("Fargate").setting(SettingBuilder::int("Port")));

    let messages = rejected(pipeline().set_value(&mut rec, "Port", json!("eighty")).await);

    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("not a valid integer"), "{}", messages[0]);
    assert!(rec.overrides().is_empty());
}

fn cluster() -> SettingBuilder {
    SettingBuilder::object("Cluster")
        .child(SettingBuilder::string("Name").validator("Required", None))
        .child(SettingBuilder::int("Size").validator("Range", Some(json!({ "Min": 1, "Max": 10 }))))
}

#[tokio::test]
async fn test_object_value_is_all_or_nothing() {
    let (_project, mut rec) = recommend(RecipeBuilder::new("Fargate").setting(cluster()));
    let pipeline = pipeline();

    let messages = rejected(
        pipeline
            .set_value(&mut rec, "Cluster", json!({ "Name": "prod", "Size": 50 }))
            .await,
    );
    assert_eq!(messages.len(), 1);
    assert!(rec.overrides().is_empty());

    pipeline
        .set_value(&mut rec, "Cluster", json!({ "Name": "prod", "Size": "4" }))
        .await
        .unwrap();
    assert_eq!(rec.override_value("Cluster.Name"), Some(&json!("prod")));
    assert_eq!(rec.override_value("Cluster.Size"), Some(&json!(4)));
    assert_eq!(rec.override_value("Cluster"), None);
    assert_eq!(
        rec.get_value_by_id("Cluster").unwrap(),
        json!({ "Name": "prod", "Size": 4 })
    );
}

#[tokio::test]
async fn test_object_value_accepts_json_text() {
    let (_project, mut rec) = recommend(RecipeBuilder::new("Fargate").setting(cluster()));

    pipeline()
        .set_value(&mut rec, "Cluster", json!(r#"{"Name":"stage"}"#))
        .await
        .unwrap();

    assert_eq!(rec.override_value("Cluster.Name"), Some(&json!("stage")));
}

#[tokio::test]
async fn test_object_validators_see_current_children() {
    let named_cluster = cluster().validator(
        "Regex",
        Some(json!({
            "Regex": r#""Name":"[a-z]+""#,
            "ValidationFailedMessage": "The cluster needs a name."
        })),
    );
    let (_project, mut rec) = recommend(RecipeBuilder::new("Fargate").setting(named_cluster));
    let pipeline = pipeline();

    pipeline
        .set_value(&mut rec, "Cluster", json!({ "Name": "prod" }))
        .await
        .unwrap();
    pipeline
        .set_value(&mut rec, "Cluster", json!({ "Size": "4" }))
        .await
        .unwrap();
    assert_eq!(
        rec.get_value_by_id("Cluster").unwrap(),
        json!({ "Name": "prod", "Size": 4 })
    );

    let messages = rejected(
        pipeline
            .set_value(&mut rec, "Cluster", json!({ "Name": "" }))
            .await,
    );
    assert!(messages.contains(&"The cluster needs a name.".to_string()), "{messages:?}");
    assert_eq!(rec.override_value("Cluster.Name"), Some(&json!("prod")));
}

#[tokio::test]
async fn test_unknown_object_child_is_fatal() {
    let (_project, mut rec) = recommend(RecipeBuilder::new("Fargate").setting(cluster()));

    let err = pipeline()
        .set_value(&mut rec, "Cluster", json!({ "Name": "prod", "Colour": "blue" }))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Core(deploy_core::Error::OptionSettingNotFound { .. })
    ));
    assert!(rec.overrides().is_empty());
}

#[tokio::test]
async fn test_unknown_setting_is_fatal() {
    let (_project, mut rec) = recommend(RecipeBuilder::new("Fargate").setting(desired_count()));

    let err = pipeline().set_value(&mut rec, "Nope", json!(1)).await.unwrap_err();

    assert!(!err.is_validation_failure());
    assert!(matches!(err, Error::Core(_)));
}

#[tokio::test]
async fn test_key_value_path_sets_one_key() {
    let (_project, mut rec) = recommend(
        RecipeBuilder::new("Fargate")
            .setting(SettingBuilder::new("EnvironmentVariables", OptionSettingValueType::KeyValue)),
    );
    let pipeline = pipeline();

    pipeline
        .set_value(&mut rec, "EnvironmentVariables.LOG_LEVEL", json!("debug"))
        .await
        .unwrap();
    pipeline
        .set_value(&mut rec, "EnvironmentVariables.REGION", json!("us-west-2"))
        .await
        .unwrap();

    assert_eq!(
        rec.override_value("EnvironmentVariables"),
        Some(&json!({ "LOG_LEVEL": "debug", "REGION": "us-west-2" }))
    );
}

#[tokio::test]
async fn test_hidden_dependents_are_reset_transitively() {
    let (_project, mut rec) = recommend(
        RecipeBuilder::new("Fargate")
            .setting(SettingBuilder::bool("UseVpc").default(false))
            .setting(SettingBuilder::string("VpcId").depends_on("UseVpc", true))
            .setting(SettingBuilder::string("SubnetId").depends_on_not_empty("VpcId")),
    );
    let pipeline = pipeline();

    pipeline.set_value(&mut rec, "UseVpc", json!(true)).await.unwrap();
    pipeline.set_value(&mut rec, "VpcId", json!("vpc-1")).await.unwrap();
    pipeline.set_value(&mut rec, "SubnetId", json!("subnet-1")).await.unwrap();
    assert_eq!(rec.overrides().len(), 3);

    pipeline.set_value(&mut rec, "UseVpc", json!("false")).await.unwrap();

    assert_eq!(rec.override_value("UseVpc"), Some(&json!(false)));
    assert_eq!(rec.override_value("VpcId"), None);
    assert_eq!(rec.override_value("SubnetId"), None);
}

#[tokio::test]
async fn test_visible_dependents_keep_their_values() {
    let (_project, mut rec) = recommend(
        RecipeBuilder::new("Fargate")
            .setting(SettingBuilder::string("VpcId"))
            .setting(SettingBuilder::string("SubnetId").depends_on_not_empty("VpcId")),
    );
    let pipeline = pipeline();

    pipeline.set_value(&mut rec, "VpcId", json!("vpc-1")).await.unwrap();
    pipeline.set_value(&mut rec, "SubnetId", json!("subnet-1")).await.unwrap();
    pipeline.set_value(&mut rec, "VpcId", json!("vpc-2")).await.unwrap();

    assert_eq!(rec.override_value("SubnetId"), Some(&json!("subnet-1")));
}

#[tokio::test]
async fn test_redeployment_rejects_non_updatable_settings() {
    let (_project, mut rec) = recommend(
        RecipeBuilder::new("Fargate")
            .setting(SettingBuilder::string("StackName").default("{ProjectName}"))
            .setting(desired_count().updatable(true)),
    );
    rec.set_existing_cloud_application(true);
    let pipeline = pipeline();

    let messages = rejected(pipeline.set_value(&mut rec, "StackName", json!("other")).await);
    assert_eq!(
        messages,
        vec!["The option setting 'StackName' cannot be updated when redeploying an existing application.".to_string()]
    );
    assert_eq!(rec.get_value_by_id("StackName").unwrap(), json!("Orders"));

    pipeline.set_value(&mut rec, "DesiredCount", json!(4)).await.unwrap();
    assert_eq!(rec.override_value("DesiredCount"), Some(&json!(4)));
}

fn cluster_name() -> SettingBuilder {
    SettingBuilder::string("ClusterName")
        .validator("ExistingResource", Some(json!({ "ResourceType": "AWS::ECS::Cluster" })))
}

#[tokio::test]
async fn test_existing_resource_through_pipeline() {
    let (_project, mut rec) = recommend(RecipeBuilder::new("Fargate").setting(cluster_name()));
    let pipeline = ValidatorPipeline::new(Arc::new(
        StaticResourceQueryer::new().with_resource("AWS::ECS::Cluster", "taken"),
    ));

    pipeline.set_value(&mut rec, "ClusterName", json!("free")).await.unwrap();

    let messages = rejected(pipeline.set_value(&mut rec, "ClusterName", json!("taken")).await);
    assert_eq!(
        messages,
        vec![
            "A resource of type 'AWS::ECS::Cluster' and name 'taken' already exists. \
             Check the AWS Console for more information on the existing resource."
                .to_string()
        ]
    );
    assert_eq!(rec.override_value("ClusterName"), Some(&json!("free")));
}

#[tokio::test]
async fn test_failed_query_is_fatal() {
    let (_project, mut rec) = recommend(RecipeBuilder::new("Fargate").setting(cluster_name()));
    let queryer = Arc::new(StaticResourceQueryer::new());
    queryer.fail_queries(true);
    let pipeline = ValidatorPipeline::new(queryer.clone());

    let err = pipeline
        .set_value(&mut rec, "ClusterName", json!("free"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ResourceQuery(_)), "{err}");
    assert_eq!(queryer.calls(), 1);
    assert!(rec.overrides().is_empty());
}

#[tokio::test]
async fn test_cancellation_interrupts_slow_query() {
    let (_project, mut rec) = recommend(RecipeBuilder::new("Fargate").setting(cluster_name()));
    let pipeline = ValidatorPipeline::new(Arc::new(
        StaticResourceQueryer::new().with_delay(Duration::from_secs(30)),
    ));

    let token = pipeline.cancellation_token().clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        token.cancel();
    });

    let err = pipeline
        .set_value(&mut rec, "ClusterName", json!("free"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Cancelled));
    assert!(rec.overrides().is_empty());
}

#[tokio::test]
async fn test_cancelled_session_makes_no_queries() {
    let (_project, mut rec) = recommend(RecipeBuilder::new("Fargate").setting(cluster_name()));
    let queryer = Arc::new(StaticResourceQueryer::new());
    let pipeline = ValidatorPipeline::new(queryer.clone());
    pipeline.cancellation_token().cancel();

    let err = pipeline
        .set_value(&mut rec, "ClusterName", json!("free"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Cancelled));
    assert_eq!(queryer.calls(), 0);
}

#[tokio::test]
async fn test_previous_settings_skip_validation_until_validate_all() {
    let (_project, mut rec) = recommend(
        RecipeBuilder::new("Fargate")
            .setting(desired_count())
            .setting(cluster_name())
            .setting(SettingBuilder::bool("UseVpc").default(false))
            .setting(
                SettingBuilder::string("VpcId")
                    .depends_on("UseVpc", true)
                    .validator("Required", None),
            ),
    );
    let queryer = Arc::new(StaticResourceQueryer::new().with_resource("AWS::ECS::Cluster", "taken"));
    let pipeline = ValidatorPipeline::new(queryer.clone());

    let previous = json!({ "DesiredCount": 20, "ClusterName": "taken" });
    let Value::Object(previous) = previous else { unreachable!() };
    assert_eq!(rec.apply_previous_settings(&previous), 2);
    assert_eq!(rec.get_value_by_id("DesiredCount").unwrap(), json!(20));
    assert_eq!(queryer.calls(), 0);

    let report = pipeline.validate_all_settings(&rec).await.unwrap();

    let failed: Vec<&str> = report.keys().map(String::as_str).collect();
    assert_eq!(failed, vec!["ClusterName", "DesiredCount"]);
    assert_eq!(
        report["DesiredCount"],
        vec!["Value must be greater than or equal to 1 and less than or equal to 10".to_string()]
    );
    assert_eq!(queryer.calls(), 1);
}

#[test]
fn test_recipe_validators_report_failures() {
    let (_project, mut rec) = recommend(
        RecipeBuilder::new("Fargate")
            .setting(SettingBuilder::int("MinCapacity").default(5))
            .setting(SettingBuilder::int("MaxCapacity").default(2))
            .validator(
                "MinMaxConstraint",
                Some(json!({
                    "MinValueOptionSettingsId": "MinCapacity",
                    "MaxValueOptionSettingsId": "MaxCapacity"
                })),
            ),
    );
    let pipeline = pipeline();

    let failures = pipeline.run_recipe_validators(&rec).unwrap();
    assert_eq!(failures.len(), 1);
    assert_eq!(
        failures[0].message(),
        "The value specified for MinCapacity must be less than or equal to the value specified for MaxCapacity"
    );

    rec.set_override("MaxCapacity", json!(10));
    assert!(pipeline.run_recipe_validators(&rec).unwrap().is_empty());
}
