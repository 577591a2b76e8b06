//! Evaluation pass orchestration.

pub mod sync;

pub use sync::{PackageReport, SyncOptions, SyncProgress, SyncReport, SyncRunner};
