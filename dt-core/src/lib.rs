#![cfg_attr(coverage, feature(coverage_attribute))]
pub mod constants;
pub mod errors;
pub mod external_storage;
pub mod k8s;
pub mod logging;

pub mod prelude {
    pub use k8s_openapi::api::core::v1 as corev1;
    pub use kube::ResourceExt;

    pub use crate::constants::*;
    pub use crate::errors::EmptyResult;
    pub use crate::k8s::{
        Listing,
        ObservedSnapshot,
        Readiness,
        ResourceKind,
        ResourceRecord,
    };
}
