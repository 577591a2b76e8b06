//! Policy evaluation.
//!
//! - [`version`] - Version parsing and numeric ordering
//! - [`status`] - [`Policy`] and [`DependencyStatus`] enums
//! - [`engine`] - The decision matrix and planned actions
//!
//! # Example
//!
//! ```
//! use depkeep::policy::{evaluate, DependencyStatus, Policy};
//!
//! let status = evaluate(Some("2.26.0"), "2.26.0", Some("2.28.0"), Policy::Latest, false);
//! assert_eq!(status, DependencyStatus::Outdated);
//! ```

pub mod engine;
pub mod status;
pub mod version;

pub use engine::{desired_version, evaluate, plan, ActionKind, PlannedAction};
pub use status::{DependencyStatus, Policy};
pub use version::{compare_versions, is_newer_version, normalize_version, PackageVersion};
