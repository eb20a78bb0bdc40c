//! Pluggable runtimes (backends) and their registry.
//!
//! A runtime takes an [`ApplicationComposer`], composes the application tree
//! and brings it to life. Which runtime runs is chosen by name at startup
//! through the [`BackendRegistry`].
//!
//! # Main Components
//!
//! - [`Runtime`] - The contract every backend implements
//! - [`BackendRegistry`] - Name → factory map, consulted once at startup
//! - [`HeadlessRuntime`] - Built-in backend that composes and prefetches without rendering

pub mod headless;
pub mod registry;

pub use headless::{FragmentReport, FragmentState, HeadlessRuntime, Reports};
pub use registry::BackendRegistry;

use crate::app::ApplicationComposer;
use crate::context::Scope;
use crate::framework::{BoxError, FrameworkError};
use async_trait::async_trait;
use std::sync::Arc;

/// A backend that executes a composed application.
#[async_trait]
pub trait Runtime: Send {
    /// Composes the application and runs it under `scope`.
    ///
    /// Programming errors (a misconfigured application) abort the start and
    /// are returned as-is.
    async fn start(&mut self, composer: &dyn ApplicationComposer, scope: Scope) -> Result<(), FrameworkError>;
}

/// Produces a fresh runtime instance.
pub type Factory = Arc<dyn Fn() -> Result<Box<dyn Runtime>, BoxError> + Send + Sync>;
