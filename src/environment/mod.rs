//! Environment detection.
//!
//! Works out, once per run, how the Python runtime on this machine was
//! installed, whether it refuses direct package installs, and whether the
//! OS-native package manager is reachable.
//!
//! Explicit values from config win over anything detected; see
//! [`EnvironmentDetector::with_override`].

pub mod detection;

pub use detection::{detect_cached, EnvironmentDetector, EXTERNALLY_MANAGED_MARKER};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::backends::BackendKind;

/// Operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    Darwin,
    Linux,
    Windows,
}

impl Os {
    /// The OS this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Os::Darwin
        } else if cfg!(target_os = "windows") {
            Os::Windows
        } else {
            Os::Linux
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Os::Darwin => "darwin",
            Os::Linux => "linux",
            Os::Windows => "windows",
        }
    }

    /// The package manager that ships with (or is conventional on) this OS.
    pub fn default_backend(&self) -> BackendKind {
        match self {
            Os::Darwin => BackendKind::Brew,
            Os::Linux => BackendKind::AptDnf,
            Os::Windows => BackendKind::WindowsStore,
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the Python runtime itself was installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallMethod {
    Brew,
    System,
    #[default]
    Standalone,
    MicrosoftStore,
}

impl InstallMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstallMethod::Brew => "brew",
            InstallMethod::System => "system",
            InstallMethod::Standalone => "standalone",
            InstallMethod::MicrosoftStore => "microsoft_store",
        }
    }
}

impl fmt::Display for InstallMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Process-wide description of the host, computed once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentDescriptor {
    pub os: Os,
    pub install_method: InstallMethod,
    /// The runtime forbids unprivileged direct installs.
    pub externally_managed: bool,
    /// The OS-native backend answered its availability check.
    pub backend_available: bool,
}

impl EnvironmentDescriptor {
    /// Conservative fallback used when probing tells us nothing.
    pub fn fallback(os: Os) -> Self {
        Self {
            os,
            install_method: InstallMethod::Standalone,
            externally_managed: false,
            backend_available: false,
        }
    }

    /// The backend consulted after Pip.
    ///
    /// A runtime installed through a package manager points at that
    /// manager; otherwise the OS default is used.
    pub fn native_backend(&self) -> BackendKind {
        match self.install_method {
            InstallMethod::Brew => BackendKind::Brew,
            InstallMethod::MicrosoftStore => BackendKind::WindowsStore,
            InstallMethod::System | InstallMethod::Standalone => self.os.default_backend(),
        }
    }
}
