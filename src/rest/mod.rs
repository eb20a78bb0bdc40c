//! # REST Protocol
//!
//! Maps the four CRUD operations onto a fixed HTTP convention:
//!
//! | Operation | Verb | Path | Success statuses | Body |
//! |---|---|---|---|---|
//! | list | GET | `/resource` | 200 | JSON array |
//! | load | GET | `/resource/{id}` | 200 | JSON object |
//! | save | PUT | `/resource/{id}` | 200, 201, 202, 204 | JSON object (request) |
//! | delete | DELETE | `/resource/{id}` | 200, 202, 204 | none |
//!
//! Any other status becomes an [`HttpError`] carrying that status. Bodies that
//! fail to decode or encode carry the negative sentinels
//! [`DECODER_ERROR`](crate::framework::DECODER_ERROR) and
//! [`ENCODER_ERROR`](crate::framework::ENCODER_ERROR) instead.
//! A request that never got a response is a
//! [`FrameworkError::Transport`], not an `HttpError`.

mod endpoint;
mod repository;
mod resource;

pub use endpoint::Endpoint;
pub use repository::RestRepository;
pub use resource::RestResource;

use crate::framework::{FrameworkError, HttpError};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub(crate) const LIST_OK: &[u16] = &[200];
pub(crate) const LOAD_OK: &[u16] = &[200];
pub(crate) const SAVE_OK: &[u16] = &[200, 201, 202, 204];
pub(crate) const DELETE_OK: &[u16] = &[200, 202, 204];

pub(crate) fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, FrameworkError> {
    serde_json::from_slice(body).map_err(|e| HttpError::decode(e).into())
}

pub(crate) fn encode<T: Serialize>(entity: &T) -> Result<Vec<u8>, FrameworkError> {
    serde_json::to_vec(entity).map_err(|e| HttpError::encode(e).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::{is_protocol_error, DECODER_ERROR, ENCODER_ERROR};
    use serde::ser::Error as _;
    use std::collections::HashMap;

    #[test]
    fn undecodable_body_is_a_decoder_error() {
        let err = decode::<Vec<String>>(b"{\"not\":\"an array\"}").unwrap_err();
        assert_eq!(err.status(), Some(DECODER_ERROR));
        assert!(is_protocol_error(&err));
    }

    struct Unencodable;

    impl Serialize for Unencodable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("refusing to serialize"))
        }
    }

    #[test]
    fn unencodable_entity_is_an_encoder_error() {
        let err = encode(&Unencodable).unwrap_err();
        assert_eq!(err.status(), Some(ENCODER_ERROR));
    }

    #[test]
    fn encode_writes_json() {
        let body = encode(&HashMap::from([("ID", "42")])).unwrap();
        assert_eq!(body, br#"{"ID":"42"}"#);
    }

    #[test]
    fn success_sets_match_the_protocol() {
        assert!(SAVE_OK.contains(&201));
        assert!(!DELETE_OK.contains(&201));
        assert_eq!(LIST_OK, LOAD_OK);
    }
}
