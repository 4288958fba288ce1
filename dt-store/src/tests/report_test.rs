use assert_fs::TempDir;
use assert_fs::prelude::*;
use bytes::Bytes;
use dt_core::external_storage::{
    MockReportStore,
    ObjectReportStore,
};
use serde_json::json;

use super::*;

#[fixture]
fn report() -> RunReport {
    let mut depl = TrackedResource::new(ResourceKind::Deployment, TEST_NAMESPACE, TEST_DEPLOYMENT);
    depl.downtimes = Downtimes::from(vec![DowntimeInterval::closed(100, 150), DowntimeInterval::open(200)]);
    depl.downtime_in_seconds = 50;

    let mut ns = TrackedNamespace::new(TEST_NAMESPACE);
    ns.add_resource(depl);
    ns.downtimes = Downtimes::from(vec![DowntimeInterval::closed(100, 150), DowntimeInterval::open(200)]);
    ns.downtime_in_seconds = 50;

    RunReport { namespaces: vec![ns], start: 10, end: 250 }
}

#[rstest]
fn test_report_shape(report: RunReport) {
    let expected = json!({
        "namespaces": [{
            "name": TEST_NAMESPACE,
            "deploymentConfigs": [],
            "deployments": [{
                "kind": "Deployment",
                "name": TEST_DEPLOYMENT,
                "namespace": TEST_NAMESPACE,
                "downtimes": [{"start": 100, "end": 150}, {"start": 200, "end": null}],
                "downtimeInSeconds": 50,
            }],
            "statefulSets": [],
            "downtimes": [{"start": 100, "end": 150}, {"start": 200, "end": null}],
            "downtimeInSeconds": 50,
        }],
        "start": 10,
        "end": 250,
    });

    assert_eq!(serde_json::to_value(&report).unwrap(), expected);
}

#[rstest]
#[tokio::test]
async fn test_write(report: RunReport) {
    let expected = Bytes::from(serde_json::to_vec(&report).unwrap());
    let mut store = MockReportStore::new();
    store
        .expect_put()
        .withf(move |data| *data == expected)
        .returning(|_| Ok(()))
        .once();
    store.expect_location().returning(|| "memory:/downtime.json".into());

    let writer = ReportWriter::new(Box::new(store));
    writer.write(&report).await.unwrap();
}

#[rstest]
#[tokio::test]
async fn test_write_failed(report: RunReport) {
    let mut store = MockReportStore::new();
    store.expect_put().returning(|_| Err(anyhow::anyhow!("disk full"))).once();
    store.expect_location().returning(|| "/nope/downtime.json".into());

    let writer = ReportWriter::new(Box::new(store));
    let err = writer.write(&report).await.unwrap_err();
    assert_contains!(err.to_string(), "/nope/downtime.json");
    assert_contains!(err.to_string(), "disk full");
}

#[rstest]
#[tokio::test]
async fn test_write_local_file(report: RunReport) {
    let dir = TempDir::new().unwrap();
    let path = dir.child("downtime.json");
    let writer = ReportWriter::new(Box::new(ObjectReportStore::new(path.to_str().unwrap()).unwrap()));

    writer.write(&RunReport { end: 1, ..report.clone() }).await.unwrap();
    writer.write(&report).await.unwrap();

    let written: RunReport = serde_json::from_slice(&std::fs::read(path.path()).unwrap()).unwrap();
    assert_eq!(written, report);
}
