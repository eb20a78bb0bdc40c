use crate::app::{Application, ApplicationComposer};
use crate::context::Scope;
use crate::framework::FrameworkError;
use crate::lifecycle::FusionConfig;
use crate::runtime::headless::Reports;
use crate::runtime::{BackendRegistry, HeadlessRuntime};
use tracing::{error, info};

/// The composition root.
///
/// `Launcher` is responsible for:
/// - **Backend selection**: owning the [`BackendRegistry`] and opening the configured backend
/// - **Root scope**: attaching the [`FusionConfig`] and the shared HTTP client
/// - **Configuration overlay**: the configured connection, authentication and title,
///   when present, replace what the application composer returns
///
/// # Example
///
/// ```ignore
/// let launcher = Launcher::new(FusionConfig::from_env()?);
/// let reports = launcher.headless_reports();
/// launcher.launch(&MoviesApp).await?;
/// ```
pub struct Launcher {
    registry: BackendRegistry,
    config: FusionConfig,
    reports: Reports,
}

impl Launcher {
    /// A launcher with the built-in headless backend registered.
    pub fn new(config: FusionConfig) -> Self {
        let registry = BackendRegistry::new();
        let reports = HeadlessRuntime::register(&registry);
        Self {
            registry,
            config,
            reports,
        }
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    /// Register additional backends here before launching.
    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    /// What the headless backend recorded.
    pub fn headless_reports(&self) -> Reports {
        self.reports.clone()
    }

    /// The scope every composer starts from.
    pub fn root_scope(&self) -> Result<Scope, FrameworkError> {
        let client = self.config.http_client()?;
        Ok(Scope::new().with_value(self.config.clone()).with_value(client))
    }

    /// Opens the configured backend and starts `composer` on it.
    ///
    /// An unknown backend fails before the composer is called.
    pub async fn launch(&self, composer: &dyn ApplicationComposer) -> Result<(), FrameworkError> {
        let backend = self.config.backend.as_str();
        let mut runtime = match self.registry.open(backend) {
            Ok(runtime) => runtime,
            Err(err) => {
                error!(backend, available = ?self.registry.names(), "cannot open backend: {err}");
                return Err(err);
            }
        };

        info!(backend, "launching");
        let configured = Configured {
            inner: composer,
            config: &self.config,
        };
        runtime.start(&configured, self.root_scope()?).await
    }
}

/// Applies the configuration on top of the composed application.
struct Configured<'a> {
    inner: &'a dyn ApplicationComposer,
    config: &'a FusionConfig,
}

impl ApplicationComposer for Configured<'_> {
    fn compose(&self, scope: &Scope) -> Application {
        let mut application = self.inner.compose(scope);
        if let Some(connection) = &self.config.connection {
            application.connection = connection.clone();
        }
        if let Some(authentication) = &self.config.authentication {
            application.authentication = authentication.clone();
        }
        if let Some(title) = &self.config.title {
            application.title = title.clone();
        }
        application
    }
}
