//! depkeep - keep declared packages at the versions their policy asks for.
//!
//! depkeep reads a list of declared dependencies, each with an update
//! policy and a target version, works out what is installed and what the
//! newest available version is, and installs, upgrades or downgrades
//! packages through pip or the platform's native package manager.
//!
//! # Modules
//!
//! - [`backends`] - Version query and install backends (pip, brew, apt/dnf, winget)
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Layered configuration loading
//! - [`environment`] - Runtime environment detection
//! - [`error`] - Error types and result aliases
//! - [`installer`] - Applying policy decisions
//! - [`policy`] - Version ordering and the policy decision table
//! - [`requirements`] - The declared dependency list
//! - [`resolver`] - Backend fallback for installed and latest versions
//! - [`runner`] - The evaluation pass
//! - [`shell`] - External command execution
//! - [`state`] - The installed-package ledger
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use depkeep::policy::{evaluate, DependencyStatus, Policy};
//!
//! // Installed 2.26.0 against a 2.26.0 target, with 2.28.0 available
//! let status = evaluate(Some("2.26.0"), "2.26.0", Some("2.28.0"), Policy::Latest, false);
//! assert_eq!(status, DependencyStatus::Outdated);
//! ```
//!
//! For a full evaluation pass against scripted commands, see the
//! integration tests.

pub mod backends;
pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod installer;
pub mod policy;
pub mod requirements;
pub mod resolver;
pub mod runner;
pub mod shell;
pub mod state;
pub mod ui;

pub use error::{DepkeepError, Result};
