//! Generic repository framework behind every fusion backend.
//!
//! This module provides the building blocks that let a runtime drive typed
//! repositories without knowing their entity types.
//!
//! # Main Components
//!
//! - [`Repository`] / [`ResourceRepository`] - Typed CRUD contracts
//! - [`RepositoryStencil`] / [`ResourceStencil`] - Their type-erased views, built with [`Stencil`] and [`ResourceStencilAdapter`]
//! - [`Identifiable`] - How an entity names itself (see [`identity_field!`](crate::identity_field))
//! - [`FrameworkError`] / [`HttpError`] / [`ValidationError`] - Common error types
//! - [`taxonomy`] - Cause-chain classification of those errors
//!
//! # Testing
//!
//! See [`mock`] module for utilities to test stencils without a server.

pub mod entity;
pub mod error;
pub mod mock;
pub mod stencil;
pub mod taxonomy;

pub use entity::{check_identity, identity_of, Entity, Identifiable};
pub use error::{BoxError, Chain, FrameworkError, HttpError, ValidationError, DECODER_ERROR, ENCODER_ERROR};
pub use mock::MockRepository;
pub use stencil::{
    unbox, Opaque, Repository, RepositoryStencil, ResourceRepository, ResourceStencil, ResourceStencilAdapter,
    Stencil,
};
pub use taxonomy::{
    classify, is_forbidden, is_internal_server_error, is_not_found, is_protocol_error, is_unauthenticated,
    validation_failed, Classify, ErrorKind,
};
