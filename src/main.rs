//! # Fusion Recipe Demo
//!
//! Composes a small movie catalogue and starts it on the configured backend
//! (the built-in `headless` one unless `FUSION_CONFIG` says otherwise).
//!
//! The headless backend prefetches every visible fragment and prints what a UI
//! would show: the loaded item count, a login prompt, or an error.

use fusion_recipe::app::{Activity, Application, ApplicationComposer, Connection, RestRepositorySpec, RestResourceSpec};
use fusion_recipe::context::Scope;
use fusion_recipe::lifecycle::{setup_tracing, FusionConfig, Launcher};
use fusion_recipe::model::{Movie, Profile};
use fusion_recipe::runtime::FragmentState;
use tracing::{error, info};

struct MoviesApp;

impl ApplicationComposer for MoviesApp {
    fn compose(&self, _scope: &Scope) -> Application {
        Application::new("Movies")
            .with_connection(Connection::default())
            .with_activity(|_: &Scope| {
                Activity::new("Overview").with_repository(RestRepositorySpec::<Movie>::new("/movies"))
            })
            .with_activity(|_: &Scope| Activity::new("Profile").with_resource(RestResourceSpec::<Profile>::new("/profile")))
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = FusionConfig::from_env().map_err(|e| e.to_string())?;
    info!(backend = %config.backend, "Starting application");

    let launcher = Launcher::new(config);
    let reports = launcher.headless_reports();

    if let Err(e) = launcher.launch(&MoviesApp).await {
        error!("Launch failed: {e}");
        return Err(e.to_string());
    }

    for report in reports.take() {
        match report.state {
            FragmentState::Loaded { items } => {
                info!(activity = %report.activity, entity_type = report.entity_type, items, "Ready")
            }
            FragmentState::LoginRequired => info!(activity = %report.activity, "Login required"),
            state => info!(activity = %report.activity, ?state, "Unavailable"),
        }
    }

    Ok(())
}
