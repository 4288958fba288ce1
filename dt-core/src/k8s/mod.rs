mod kind;
mod lister;
mod snapshot;

pub use kind::ResourceKind;
pub use lister::*;
pub use snapshot::*;

#[cfg(test)]
pub mod tests;
