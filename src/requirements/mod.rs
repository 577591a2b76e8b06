//! Declared dependencies.
//!
//! The requirements file lists each package with a policy and a target:
//!
//! ```json
//! {"dependencies": [{"package": "requests", "version": {"policy": "latest", "target": "2.26.0"}}]}
//! ```

pub mod dependency;
pub mod loader;

pub use dependency::{Dependency, DependencyDocument, DependencyRecord, VersionRecord};
pub use loader::{load_requirements, parse_requirements};
