//! The declarative application tree.
//!
//! - [`Application`] - Root configuration: title, activities, authentication, connection
//! - [`Activity`] - A screen and its data [`Binding`]s
//! - [`RepositorySpec`] / [`ResourceSpec`] - Typed nodes that produce type-erased stencils
//! - [`CallbackRepository`] - A repository node backed by closures

pub mod application;
pub mod callback;
pub mod spec;

pub use application::*;
pub use callback::CallbackRepository;
pub use spec::{RepositorySpec, ResourceSpec, RestRepositorySpec, RestResourceSpec};
