//! Version resolution across backends.
//!
//! Pip is asked first regardless of how the runtime was installed; an
//! installed version it reports is authoritative. Only when Pip has no
//! answer is the OS-native backend consulted, and only if the environment
//! detector found it reachable.

use crate::backends::{backend_for, BackendKind, VersionBackend};
use crate::environment::EnvironmentDescriptor;
use crate::shell::CommandRunner;

/// What the backends reported for one package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub installed: Option<String>,
    pub latest: Option<String>,
    /// Backend that reported the installed version, or failing that the
    /// latest version. `None` when nobody answered.
    pub source: Option<BackendKind>,
}

/// Pip plus, when reachable, the environment's native backend.
pub struct Resolver<'a> {
    pip: Box<dyn VersionBackend + 'a>,
    native: Option<Box<dyn VersionBackend + 'a>>,
}

impl<'a> Resolver<'a> {
    /// Build the backends appropriate for `env`.
    pub fn new(runner: &'a dyn CommandRunner, python: &str, env: &EnvironmentDescriptor) -> Self {
        let native = env
            .backend_available
            .then(|| backend_for(env.native_backend(), runner, python));
        Self {
            pip: backend_for(BackendKind::Pip, runner, python),
            native,
        }
    }

    /// Query installed and latest versions for `package`.
    pub fn resolve(&self, package: &str) -> Resolution {
        tracing::debug!(package, "resolving versions");

        let mut source = None;
        let installed = self
            .first_answer(|backend| backend.installed_version(package))
            .map(|(kind, version)| {
                source = Some(kind);
                version
            });
        let latest = self
            .first_answer(|backend| backend.latest_version(package))
            .map(|(kind, version)| {
                source.get_or_insert(kind);
                version
            });

        let resolution = Resolution {
            installed,
            latest,
            source,
        };
        tracing::debug!(
            package,
            installed = ?resolution.installed,
            latest = ?resolution.latest,
            source = ?resolution.source.map(|k| k.name()),
            "resolved"
        );
        resolution
    }

    /// The backend an install for `resolution` should go through.
    ///
    /// Pip unless the native backend is the one that knows the package.
    pub fn installer_for(&self, resolution: &Resolution) -> &dyn VersionBackend {
        match (&self.native, resolution.source) {
            (Some(native), Some(kind)) if native.kind() == kind => native.as_ref(),
            _ => self.pip.as_ref(),
        }
    }

    fn first_answer<F>(&self, ask: F) -> Option<(BackendKind, String)>
    where
        F: Fn(&dyn VersionBackend) -> Option<String>,
    {
        std::iter::once(self.pip.as_ref())
            .chain(self.native.as_deref())
            .find_map(|backend| ask(backend).map(|version| (backend.kind(), version)))
    }
}

/// Resolve one package against the backends for `env`.
pub fn resolve(
    package: &str,
    env: &EnvironmentDescriptor,
    runner: &dyn CommandRunner,
    python: &str,
) -> Resolution {
    Resolver::new(runner, python, env).resolve(package)
}
