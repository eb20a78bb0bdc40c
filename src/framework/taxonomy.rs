//! # Error Taxonomy
//!
//! Classification is structural: an error is "not-found" if some link in its
//! `source()` chain is a classifiable error whose [`Classify::not_found`]
//! predicate returns `true`. Wrapping an [`HttpError`] in another error never
//! hides its kind.
//!
//! | Predicate | Rule |
//! |-----------|------|
//! | [`is_not_found`] | HTTP 404 |
//! | [`is_forbidden`] | HTTP 403 |
//! | [`is_unauthenticated`] | HTTP 401 |
//! | [`is_internal_server_error`] | HTTP 500..=511 |
//! | [`is_protocol_error`] | decode / encode sentinels |
//! | [`validation_failed`] | any [`ValidationError`] |
//!
//! The UI layer uses these to decide between a login prompt (unauthenticated),
//! a permanent denial notice (forbidden) and a not-found state. Nothing here
//! retries.

use crate::framework::error::{FrameworkError, HttpError, ValidationError, DECODER_ERROR, ENCODER_ERROR};
use std::error::Error;

/// Predicates an error can answer about itself. Every predicate defaults to `false`.
pub trait Classify {
    fn not_found(&self) -> bool {
        false
    }

    /// Authenticated, but access control denies the resource. Usually permanent.
    fn forbidden(&self) -> bool {
        false
    }

    /// No valid authentication was presented. Usually solved by a login.
    fn unauthenticated(&self) -> bool {
        false
    }

    fn internal_server_error(&self) -> bool {
        false
    }

    fn protocol_error(&self) -> bool {
        false
    }

    fn failed_validation(&self) -> bool {
        false
    }
}

impl Classify for HttpError {
    fn not_found(&self) -> bool {
        self.status() == 404
    }

    fn forbidden(&self) -> bool {
        self.status() == 403
    }

    fn unauthenticated(&self) -> bool {
        self.status() == 401
    }

    fn internal_server_error(&self) -> bool {
        (500..=511).contains(&self.status())
    }

    fn protocol_error(&self) -> bool {
        self.status() == DECODER_ERROR || self.status() == ENCODER_ERROR
    }
}

impl Classify for ValidationError {
    fn failed_validation(&self) -> bool {
        true
    }
}

impl Classify for FrameworkError {
    fn not_found(&self) -> bool {
        self.inner().is_some_and(|c| c.not_found())
    }

    fn forbidden(&self) -> bool {
        self.inner().is_some_and(|c| c.forbidden())
    }

    fn unauthenticated(&self) -> bool {
        self.inner().is_some_and(|c| c.unauthenticated())
    }

    fn internal_server_error(&self) -> bool {
        self.inner().is_some_and(|c| c.internal_server_error())
    }

    fn protocol_error(&self) -> bool {
        self.inner().is_some_and(|c| c.protocol_error())
    }

    fn failed_validation(&self) -> bool {
        self.inner().is_some_and(|c| c.failed_validation())
    }
}

impl FrameworkError {
    fn inner(&self) -> Option<&dyn Classify> {
        match self {
            FrameworkError::Http(e) => Some(e),
            FrameworkError::Validation(e) => Some(e),
            _ => None,
        }
    }
}

/// The single most specific kind of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Cancelled,
    /// Misconfigured application. Must abort composition.
    Programming,
    FailedValidation,
    Unauthenticated,
    Forbidden,
    NotFound,
    InternalServerError,
    ProtocolError,
    /// No response was received.
    Transport,
    Other,
}

fn classifiable<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a dyn Classify> {
    if let Some(e) = err.downcast_ref::<FrameworkError>() {
        return Some(e);
    }
    if let Some(e) = err.downcast_ref::<HttpError>() {
        return Some(e);
    }
    if let Some(e) = err.downcast_ref::<ValidationError>() {
        return Some(e);
    }
    None
}

fn chain<'a>(err: &'a (dyn Error + 'static)) -> impl Iterator<Item = &'a (dyn Error + 'static)> {
    std::iter::successors(Some(err), |e| (*e).source())
}

fn any_link(err: &(dyn Error + 'static), predicate: impl Fn(&dyn Classify) -> bool) -> bool {
    chain(err).filter_map(classifiable).any(predicate)
}

pub fn is_not_found(err: &(dyn Error + 'static)) -> bool {
    any_link(err, |c| c.not_found())
}

pub fn is_forbidden(err: &(dyn Error + 'static)) -> bool {
    any_link(err, |c| c.forbidden())
}

pub fn is_unauthenticated(err: &(dyn Error + 'static)) -> bool {
    any_link(err, |c| c.unauthenticated())
}

pub fn is_internal_server_error(err: &(dyn Error + 'static)) -> bool {
    any_link(err, |c| c.internal_server_error())
}

pub fn is_protocol_error(err: &(dyn Error + 'static)) -> bool {
    any_link(err, |c| c.protocol_error())
}

/// Returns the message of the error if some link failed validation.
pub fn validation_failed(err: &(dyn Error + 'static)) -> Option<String> {
    if any_link(err, |c| c.failed_validation()) {
        Some(err.to_string())
    } else {
        None
    }
}

/// Reduces an error chain to one [`ErrorKind`].
pub fn classify(err: &(dyn Error + 'static)) -> ErrorKind {
    let framework = chain(err).find_map(|e| e.downcast_ref::<FrameworkError>());
    match framework {
        Some(FrameworkError::Cancelled) => return ErrorKind::Cancelled,
        Some(e) if e.is_programming_error() => return ErrorKind::Programming,
        _ => {}
    }

    if any_link(err, |c| c.failed_validation()) {
        ErrorKind::FailedValidation
    } else if is_unauthenticated(err) {
        ErrorKind::Unauthenticated
    } else if is_forbidden(err) {
        ErrorKind::Forbidden
    } else if is_not_found(err) {
        ErrorKind::NotFound
    } else if is_internal_server_error(err) {
        ErrorKind::InternalServerError
    } else if is_protocol_error(err) {
        ErrorKind::ProtocolError
    } else if matches!(framework, Some(FrameworkError::Transport(_))) {
        ErrorKind::Transport
    } else {
        ErrorKind::Other
    }
}
