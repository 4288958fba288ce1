use kube::api::DynamicObject;

use super::*;

fn deployment(desired: Option<serde_json::Value>, ready: Option<serde_json::Value>) -> DynamicObject {
    serde_json::from_value(workload_obj("apps/v1", "Deployment", TEST_NAMESPACE, TEST_DEPLOYMENT, desired, ready))
        .unwrap()
}

#[rstest]
#[case::ready(Some(json!(3)), Some(json!(2)), Some(2), Some(3))]
#[case::nothing_ready(Some(json!(3)), None, Some(0), Some(3))]
#[case::default_replicas(None, Some(json!(1)), Some(1), Some(1))]
#[case::malformed_ready(Some(json!(1)), Some(json!("lots")), None, Some(1))]
#[case::malformed_desired(Some(json!("lots")), Some(json!(1)), Some(1), None)]
fn test_record_from(
    #[case] desired: Option<serde_json::Value>,
    #[case] ready: Option<serde_json::Value>,
    #[case] expected_ready: Option<i64>,
    #[case] expected_desired: Option<i64>,
) {
    let rec = ResourceKind::Deployment.record_from(&deployment(desired, ready)).unwrap();

    assert_eq!(rec.name, TEST_DEPLOYMENT);
    assert_eq!(rec.namespace, TEST_NAMESPACE);
    assert_eq!(rec.ready_count, expected_ready);
    assert_eq!(rec.desired_count, expected_desired);
}

#[rstest]
fn test_record_from_no_namespace() {
    let mut obj = deployment(Some(json!(1)), Some(json!(1)));
    obj.metadata.namespace = None;

    assert_eq!(ResourceKind::Deployment.record_from(&obj), None);
}

#[rstest]
#[case::dc_scaled_down(ResourceKind::DeploymentConfig, 0, false)]
#[case::dc(ResourceKind::DeploymentConfig, 2, true)]
#[case::deployment_scaled_down(ResourceKind::Deployment, 0, true)]
#[case::statefulset_scaled_down(ResourceKind::StatefulSet, 0, true)]
fn test_is_tracked(#[case] kind: ResourceKind, #[case] desired: i64, #[case] expected: bool) {
    let rec = ResourceRecord::new(TEST_NAMESPACE, "foo", 0, desired);
    assert_eq!(kind.is_tracked(&rec), expected);
}

#[rstest]
#[case::dc(ResourceKind::DeploymentConfig, "apps.openshift.io/v1", "deploymentconfigs")]
#[case::deployment(ResourceKind::Deployment, "apps/v1", "deployments")]
#[case::statefulset(ResourceKind::StatefulSet, "apps/v1", "statefulsets")]
fn test_api_resource(#[case] kind: ResourceKind, #[case] api_version: &str, #[case] plural: &str) {
    let ar = kind.api_resource();
    assert_eq!(ar.api_version, api_version);
    assert_eq!(ar.plural, plural);
    assert_eq!(ar.kind, kind.gvk().kind);
}
