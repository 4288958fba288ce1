#![cfg_attr(coverage, feature(coverage_attribute))]
mod downtimes;
mod report;
mod tracked;
mod tracker;

pub use crate::downtimes::{
    DowntimeInterval,
    Downtimes,
    Transition,
};
pub use crate::report::{
    ReportWriter,
    RunReport,
};
pub use crate::tracked::{
    TrackedNamespace,
    TrackedResource,
};
pub use crate::tracker::DowntimeTracker;

#[cfg(test)]
mod tests;
