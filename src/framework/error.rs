//! # Framework Errors
//!
//! This module defines the common error types used throughout the framework.
//! By centralizing error definitions, every repository, stencil and runtime
//! reports failures through the same [`FrameworkError`] enum, and the
//! [`taxonomy`](crate::framework::taxonomy) module can classify them uniformly.
//!
//! ## Error Kinds
//!
//! - **Transport**: no response was received at all ([`FrameworkError::Transport`]).
//! - **HTTP status / codec**: a response arrived but did not fit the protocol ([`HttpError`]).
//! - **Validation**: the backend or a form rejected the value ([`ValidationError`]).
//! - **Programming errors**: the application is misconfigured
//!   (see [`FrameworkError::is_programming_error`]).

use std::fmt;

/// Boxed error type used for wrapped causes and factory failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Synthetic status for a response body that could not be decoded.
pub const DECODER_ERROR: i32 = -1;

/// Synthetic status for an entity that could not be encoded.
pub const ENCODER_ERROR: i32 = -2;

/// A failed HTTP exchange.
///
/// The status is either a real HTTP status code or one of the two negative
/// sentinels [`DECODER_ERROR`] and [`ENCODER_ERROR`]. It is never zero.
#[derive(Debug, thiserror::Error)]
#[error("http-error: {status}")]
pub struct HttpError {
    status: i32,
    #[source]
    cause: Option<BoxError>,
}

impl HttpError {
    /// An unexpected response status.
    pub fn new(status: u16) -> Self {
        Self {
            status: i32::from(status),
            cause: None,
        }
    }

    /// The response body could not be decoded into the entity type.
    pub fn decode(cause: impl Into<BoxError>) -> Self {
        Self {
            status: DECODER_ERROR,
            cause: Some(cause.into()),
        }
    }

    /// The entity could not be encoded into a request body.
    pub fn encode(cause: impl Into<BoxError>) -> Self {
        Self {
            status: ENCODER_ERROR,
            cause: Some(cause.into()),
        }
    }

    pub fn status(&self) -> i32 {
        self.status
    }

    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }
}

/// A validation has failed.
///
/// Always classified as failed-validation, regardless of any wrapped cause.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
    #[source]
    cause: Option<BoxError>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(message: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            cause: Some(cause.into()),
        }
    }

    /// The human readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors that can occur within the framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    /// No response was received.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Http(#[from] HttpError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The execution scope was cancelled or its deadline passed.
    #[error("operation cancelled")]
    Cancelled,

    /// An opaque value handed to a stencil has the wrong underlying type.
    #[error("type mismatch: expected a value of type {expected}")]
    TypeMismatch { expected: &'static str },

    #[error("type {entity_type} has no identity")]
    MissingIdentity { entity_type: &'static str },

    #[error("no value of type {0} attached to the scope")]
    MissingContext(&'static str),

    #[error("unsupported authentication: {0}")]
    UnsupportedAuthentication(String),

    #[error("invalid url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("runtime '{0}' is not available")]
    BackendNotFound(String),

    #[error("cannot create an instance of runtime '{name}': {source}")]
    BackendFailed {
        name: String,
        #[source]
        source: BoxError,
    },

    /// A callback repository was asked for an operation it has no handler for.
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),
}

impl FrameworkError {
    /// Returns `true` for errors caused by a misconfigured application rather
    /// than a transient condition. These must abort composition.
    pub fn is_programming_error(&self) -> bool {
        matches!(
            self,
            FrameworkError::TypeMismatch { .. }
                | FrameworkError::MissingIdentity { .. }
                | FrameworkError::MissingContext(_)
                | FrameworkError::UnsupportedAuthentication(_)
                | FrameworkError::InvalidUrl { .. }
                | FrameworkError::BackendNotFound(_)
        )
    }

    /// The HTTP status of the failure, if it is an [`HttpError`].
    pub fn status(&self) -> Option<i32> {
        match self {
            FrameworkError::Http(e) => Some(e.status()),
            _ => None,
        }
    }
}

/// Formats an error together with its chain of causes, `outer: inner: root`.
pub struct Chain<'a>(pub &'a (dyn std::error::Error + 'static));

impl fmt::Display for Chain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)?;
        let mut source = self.0.source();
        while let Some(cause) = source {
            write!(f, ": {cause}")?;
            source = cause.source();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_are_negative_and_distinct() {
        assert!(DECODER_ERROR < 0);
        assert!(ENCODER_ERROR < 0);
        assert_ne!(DECODER_ERROR, ENCODER_ERROR);
    }

    #[test]
    fn decode_error_keeps_cause() {
        let cause = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = HttpError::decode(cause);
        assert_eq!(err.status(), DECODER_ERROR);
        assert!(err.cause().is_some());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn http_error_display() {
        assert_eq!(HttpError::new(404).to_string(), "http-error: 404");
    }

    #[test]
    fn programming_errors_are_flagged() {
        assert!(FrameworkError::MissingContext("Application").is_programming_error());
        assert!(FrameworkError::TypeMismatch { expected: "Movie" }.is_programming_error());
        assert!(FrameworkError::BackendNotFound("wasm/js".into()).is_programming_error());
        assert!(!FrameworkError::Cancelled.is_programming_error());
        assert!(!FrameworkError::from(HttpError::new(500)).is_programming_error());
    }

    #[test]
    fn chain_formats_causes() {
        let err = FrameworkError::from(ValidationError::with_cause(
            "title is required",
            HttpError::new(422),
        ));
        assert_eq!(
            Chain(&err).to_string(),
            "title is required: http-error: 422"
        );
    }
}
