use bytes::Bytes;
use dt_core::errors::*;
use dt_core::external_storage::ReportStore;
use serde::{
    Deserialize,
    Serialize,
};
use tracing::*;

use crate::TrackedNamespace;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub namespaces: Vec<TrackedNamespace>,
    pub start: i64,
    pub end: i64,
}

pub struct ReportWriter {
    store: Box<dyn ReportStore>,
}

impl ReportWriter {
    pub fn new(store: Box<dyn ReportStore>) -> ReportWriter {
        ReportWriter { store }
    }

    pub fn location(&self) -> String {
        self.store.location()
    }

    // Every write replaces the previous report entirely, so a failed write loses nothing; the next
    // successful one carries all of the data.
    pub async fn write(&self, report: &RunReport) -> EmptyResult {
        let data = serde_json::to_vec(report)?;
        let size = data.len();
        self.store
            .put(Bytes::from(data))
            .await
            .map_err(|err| anyhow!("could not write report to {}: {err}", self.location()))?;

        debug!("wrote {size} bytes to {}", self.location());
        Ok(())
    }
}
