use crate::app::ApplicationComposer;
use crate::context::Scope;
use crate::framework::{BoxError, FrameworkError};
use crate::runtime::{Factory, Runtime};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};

/// Maps backend names to the factories that create them.
///
/// Built once at startup and handed to the composition root. The map is the
/// only shared mutable state in the framework; the lock is held for a single
/// map read or write, never while a factory runs.
#[derive(Default)]
pub struct BackendRegistry {
    factories: Mutex<HashMap<String, Factory>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `factory` under `name`. A later registration replaces an earlier one.
    pub fn register<F>(&self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Result<Box<dyn Runtime>, BoxError> + Send + Sync + 'static,
    {
        let name = name.into();
        let previous = self
            .factories
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.clone(), Arc::new(factory));
        if previous.is_some() {
            warn!(backend = %name, "runtime registration replaced");
        } else {
            info!(backend = %name, "runtime registered");
        }
    }

    /// Creates a fresh instance of the runtime registered as `name`.
    pub fn open(&self, name: &str) -> Result<Box<dyn Runtime>, FrameworkError> {
        let factory = self
            .factories
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| FrameworkError::BackendNotFound(name.to_string()))?;

        factory().map_err(|source| FrameworkError::BackendFailed {
            name: name.to_string(),
            source,
        })
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .factories
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Opens `name` and starts it. An unknown name fails before anything is composed.
    pub async fn start(
        &self,
        name: &str,
        composer: &dyn ApplicationComposer,
        scope: Scope,
    ) -> Result<(), FrameworkError> {
        let mut runtime = self.open(name)?;
        info!(backend = name, "starting runtime");
        runtime.start(composer, scope).await
    }
}
