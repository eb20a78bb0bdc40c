//! # Observability & Tracing
//!
//! This module provides the tracing infrastructure for the whole framework.
//!
//! ## Overview
//!
//! The [`setup_tracing`] function initializes structured logging with the `tracing` crate.
//! REST clients open one span per operation carrying the `entity_type`, so every
//! line below it is attributable to a repository without printing module paths.
//!
//! ## Configuration
//!
//! - **Structured logging** with `tracing` crate
//! - **Configurable log levels** via `RUST_LOG` environment variable
//! - **Compact format** optimized for development
//!
//! ## What Gets Traced
//!
//! - **Composition**: application and activity composition, stencil creation
//! - **Backends**: registration, replacement (`warn`), start
//! - **Requests**: verb, URL, status and size at `debug`; transport failures at `warn`
//! - **Fragments**: prefetch outcome per activity binding
//!
//! ## Usage Examples
//!
//! ```bash
//! # Compact logs (default)
//! RUST_LOG=info cargo run
//!
//! # Show every request
//! RUST_LOG=debug cargo run
//!
//! # Filter to the REST client
//! RUST_LOG=fusion_recipe::rest=debug cargo run
//! ```
//!
//! With `RUST_LOG=debug` a prefetch of the movie list looks like:
//!
//! ```text
//! INFO application composed title="Movies" activities=1
//! INFO rest repository entity_type="Movie" url=http://localhost:8080/movies
//! DEBUG list{entity_type="Movie"}: GET http://localhost:8080/movies status=200 size=57 ok
//! DEBUG list{entity_type="Movie"}: listed size=2
//! INFO fragment loaded activity="Overview" entity_type="Movie" items=2
//! ```

/// Installs the global `fmt` subscriber. Call once, at the top of `main`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Don't show module paths - spans carry entity_type instead
        .compact()
        .init();
}
