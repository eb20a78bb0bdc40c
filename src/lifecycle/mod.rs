//! Startup and lifecycle management.
//!
//! This module contains the infrastructure for bringing an application up:
//!
//! - **Configuration**: reading [`FusionConfig`] from TOML
//! - **Composition root**: the [`Launcher`] owning the backend registry and the root scope
//! - **Observability setup**: initializing tracing and logging
//!
//! # Main Components
//!
//! - [`Launcher`] - Opens the configured backend and starts the application on it
//! - [`FusionConfig`] - Backend name, connection, authentication, timeouts
//! - [`setup_tracing`] - Initializes the tracing/logging infrastructure

pub mod config;
pub mod launcher;
pub mod tracing;

pub use config::{ConfigError, FusionConfig};
pub use launcher::Launcher;
pub use tracing::*;
