//! Reading the requirements file.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use super::dependency::{Dependency, DependencyDocument};
use crate::error::{DepkeepError, Result};

/// Load the declared dependencies from `path`.
///
/// # Errors
///
/// `RequirementsNotFound` if the file is absent; `RequirementsParseError`
/// if it is not valid JSON, a target is empty, or a package is declared
/// twice.
pub fn load_requirements(path: &Path) -> Result<Vec<Dependency>> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DepkeepError::RequirementsNotFound {
                path: path.to_path_buf(),
            }
        } else {
            DepkeepError::Io(e)
        }
    })?;

    parse_requirements(&content, path)
}

/// Parse requirements JSON; `source` is only used in errors.
pub fn parse_requirements(content: &str, source: &Path) -> Result<Vec<Dependency>> {
    let invalid = |message: String| DepkeepError::RequirementsParseError {
        path: source.to_path_buf(),
        message,
    };

    let document: DependencyDocument =
        serde_json::from_str(content).map_err(|e| invalid(e.to_string()))?;

    let mut seen = HashSet::new();
    let mut dependencies = Vec::with_capacity(document.dependencies.len());
    for record in document.dependencies {
        let package = record.package.trim();
        if package.is_empty() {
            return Err(invalid("dependency with empty package name".to_string()));
        }
        if record.version.target.trim().is_empty() {
            return Err(invalid(format!("'{}' has no target version", package)));
        }
        if !seen.insert(package.to_string()) {
            return Err(invalid(format!("'{}' is declared more than once", package)));
        }
        dependencies.push(Dependency::new(
            package,
            record.version.policy,
            record.version.target.trim(),
        ));
    }

    Ok(dependencies)
}
