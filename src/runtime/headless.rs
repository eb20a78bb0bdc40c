//! # Headless Runtime
//!
//! A backend without any rendering. It walks the composed application the same
//! way a UI backend does and prefetches what a UI would show first:
//!
//! 1. Compose the [`Application`] and attach it to the scope.
//! 2. Compose every activity and create a stencil for every binding.
//!    Any failure here is a programming error and aborts the start.
//! 3. For each *visible* activity, `list()` every repository and `load()`
//!    every resource, recording the outcome as a [`FragmentState`].
//!
//! The recorded [`FragmentReport`]s are shared through a [`Reports`] handle, so
//! the demo binary and the integration tests can inspect what happened.

use crate::app::{Application, ApplicationComposer, Binding};
use crate::context::Scope;
use crate::framework::{classify, Chain, ErrorKind, FrameworkError, RepositoryStencil, ResourceStencil};
use crate::runtime::{BackendRegistry, Runtime};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

/// What a bound fragment would display after its first load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentState {
    Loaded { items: usize },
    NotFound,
    /// The backend wants credentials; a UI would show its login prompt.
    LoginRequired,
    Forbidden,
    Failed { message: String },
}

impl FragmentState {
    /// Maps a prefetch result through the error taxonomy.
    ///
    /// Programming errors are handed back unchanged so the caller can abort.
    pub fn from_result(result: Result<usize, FrameworkError>) -> Result<Self, FrameworkError> {
        let err = match result {
            Ok(items) => return Ok(FragmentState::Loaded { items }),
            Err(err) => err,
        };
        let state = match classify(&err) {
            ErrorKind::Programming => return Err(err),
            ErrorKind::NotFound => FragmentState::NotFound,
            ErrorKind::Unauthenticated => FragmentState::LoginRequired,
            ErrorKind::Forbidden => FragmentState::Forbidden,
            _ => FragmentState::Failed {
                message: Chain(&err).to_string(),
            },
        };
        Ok(state)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentReport {
    pub activity: String,
    pub entity_type: &'static str,
    pub state: FragmentState,
}

/// Shared log of fragment reports for the most recent run.
///
/// Every headless instance created by the same registration writes here; a
/// run clears what the previous one left behind before prefetching.
#[derive(Debug, Clone, Default)]
pub struct Reports(Arc<Mutex<Vec<FragmentReport>>>);

impl Reports {
    pub fn snapshot(&self) -> Vec<FragmentReport> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Drains the log.
    pub fn take(&self) -> Vec<FragmentReport> {
        std::mem::take(&mut *self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn clear(&self) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    fn push(&self, report: FragmentReport) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).push(report);
    }
}

enum Bound {
    Repository(Arc<dyn RepositoryStencil>),
    Resource(Arc<dyn ResourceStencil>),
}

impl Bound {
    fn entity_type(&self) -> &'static str {
        match self {
            Bound::Repository(stencil) => stencil.entity_type(),
            Bound::Resource(stencil) => stencil.entity_type(),
        }
    }

    async fn prefetch(&self) -> Result<usize, FrameworkError> {
        match self {
            Bound::Repository(stencil) => stencil.list().await.map(|items| items.len()),
            Bound::Resource(stencil) => stencil.load().await.map(|_| 1),
        }
    }
}

pub struct HeadlessRuntime {
    reports: Reports,
}

impl HeadlessRuntime {
    pub const NAME: &'static str = "headless";

    pub fn new(reports: Reports) -> Self {
        Self { reports }
    }

    /// Registers the headless backend and returns the handle its instances report to.
    pub fn register(registry: &BackendRegistry) -> Reports {
        let reports = Reports::default();
        let shared = reports.clone();
        registry.register(Self::NAME, move || {
            Ok(Box::new(HeadlessRuntime::new(shared.clone())) as Box<dyn Runtime>)
        });
        reports
    }
}

#[async_trait]
impl Runtime for HeadlessRuntime {
    async fn start(&mut self, composer: &dyn ApplicationComposer, scope: Scope) -> Result<(), FrameworkError> {
        let application = composer.compose(&scope);
        info!(title = %application.title, activities = application.activities.len(), "application composed");
        let scope = scope.with_value::<Application>(application.clone());

        // Compose everything before touching the network, so a misconfigured
        // binding aborts the start without partial side effects.
        let mut fragments = Vec::new();
        for activity_composer in &application.activities {
            let activity = activity_composer.compose(&scope);
            debug!(activity = %activity.title, bindings = activity.bindings.len(), "activity composed");
            let mut bound = Vec::with_capacity(activity.bindings.len());
            for binding in &activity.bindings {
                bound.push(match binding {
                    Binding::Repository(spec) => Bound::Repository(spec.new_stencil(&scope)?),
                    Binding::Resource(spec) => Bound::Resource(spec.new_stencil(&scope)?),
                });
            }
            fragments.push((activity, bound));
        }

        self.reports.clear();
        for (activity, bound) in fragments.iter().filter(|(activity, _)| activity.visible) {
            for fragment in bound {
                let entity_type = fragment.entity_type();
                let state = FragmentState::from_result(fragment.prefetch().await)?;
                match &state {
                    FragmentState::Loaded { items } => {
                        info!(activity = %activity.title, entity_type, items, "fragment loaded")
                    }
                    other => warn!(activity = %activity.title, entity_type, state = ?other, "fragment not loaded"),
                }
                self.reports.push(FragmentReport {
                    activity: activity.title.clone(),
                    entity_type,
                    state,
                });
            }
        }

        info!(title = %application.title, "headless run complete");
        Ok(())
    }
}
