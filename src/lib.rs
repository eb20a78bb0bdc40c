#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Fusion Recipe
//!
//! > **A Recipe for Declarative, Backend-Agnostic CRUD Applications in Rust.**
//!
//! This crate demonstrates a pattern for describing an application as a tree of
//! typed specification values and letting a pluggable runtime wire it to a REST
//! backend. The runtime never knows your entity types: every typed repository is
//! handed to it through a type-erased *stencil*.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Why Generic Repositories + Type Erasure?
//!
//! - **Typed at the edges**: `RestRepository<Movie>` speaks `Movie`, checked by the compiler.
//! - **Uniform in the middle**: a runtime holds `Arc<dyn RepositoryStencil>` for every entity type.
//! - **One checked boundary**: opaque values are downcast exactly once; a wrong type is an
//!   error, never undefined behaviour.
//!
//! ## 🚀 Core Concepts
//!
//! ### Generics: The Power of `T`
//! You'll see `Stencil<T, R: Repository<T>>` everywhere. We wrote the boxing and
//! unboxing **once**, and it works for movies, profiles and whatever you add next.
//!
//! ### Context: Configuration Without Globals
//! A [`Scope`](context::Scope) carries the [`Application`](app::Application), the shared
//! HTTP client and the cancellation token down the composition tree, keyed by type.
//!
//! ### Mocking: Testing without Pain
//! See the [`framework::mock`] module for an expectation-based `MockRepository`.
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. Type-Safe Error Handling
//! Every operation returns [`FrameworkError`](framework::FrameworkError). HTTP failures
//! keep their status, and the [`taxonomy`](framework::taxonomy) answers *is this a
//! not-found? a login problem?* by walking the cause chain, so wrapping never hides a kind.
//!
//! ### 2. Cancellation
//! Every request races the scope's [`CancelToken`](context::CancelToken). A cancelled
//! scope drops the in-flight request and returns `Cancelled`.
//!
//! ### 3. Observability
//! We use `tracing` everywhere with structured logging. See the [`lifecycle::tracing`]
//! module for details.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! - **Role**: Repository contracts, stencils, identity and errors.
//! - **Key items**: [`Repository`](framework::Repository), [`Stencil`](framework::Stencil),
//!   [`Identifiable`](framework::Identifiable).
//!
//! ### 2. The Tree ([`app`], [`context`])
//! - **Role**: The declarative application and the scope it is composed in.
//! - **Key items**: [`Application`](app::Application), [`Activity`](app::Activity),
//!   [`Scope`](context::Scope).
//!
//! ### 3. The Wire ([`rest`])
//! - **Role**: List / Load / Save / Delete as GET / GET / PUT / DELETE.
//! - **Key items**: [`RestRepository`](rest::RestRepository), [`RestResource`](rest::RestResource).
//!
//! ### 4. The Backends ([`runtime`], [`lifecycle`])
//! - **Role**: Choosing a backend by name and starting the application on it.
//! - **Key items**: [`BackendRegistry`](runtime::BackendRegistry), [`Launcher`](lifecycle::Launcher).
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run the headless demo against a local backend
//! RUST_LOG=info cargo run
//!
//! # With a config file
//! FUSION_CONFIG=fusion.toml RUST_LOG=debug cargo run
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod app;
pub mod context;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod rest;
pub mod runtime;
