//! # Entity Identity
//!
//! Every entity handled by a [`Repository`](crate::framework::Repository) needs a
//! stable string identity, used to build REST paths like `/movies/{id}`.
//!
//! There are two ways to provide it:
//!
//! 1. **Accessor**: implement [`Identifiable`] by hand. Use this when the
//!    identity is computed or lives in a non-string field.
//! 2. **Conventional field**: let [`identity_field!`](crate::identity_field) generate the
//!    impl from a `String` field. The macro only compiles if the field derefs to `str`.
//!
//! A type has exactly one `Identifiable` impl, so a hand-written accessor always
//! wins over a field that merely happens to be called `id`.
//!
//! ```rust
//! use fusion_recipe::framework::identity_of;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Serialize, Deserialize)]
//! struct Movie {
//!     #[serde(rename = "ID")]
//!     id: String,
//!     #[serde(rename = "Title")]
//!     title: String,
//! }
//!
//! fusion_recipe::identity_field!(Movie, id);
//!
//! let movie = Movie { id: "42".into(), title: "Dune".into() };
//! assert_eq!(identity_of(&movie).unwrap(), "42");
//! ```

use crate::framework::error::FrameworkError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Resolves the identity of an entity value.
pub trait Identifiable {
    fn id(&self) -> String;
}

/// Everything the REST repository needs from an entity type.
///
/// Implemented automatically for every serializable, identifiable value.
pub trait Entity: Identifiable + Serialize + DeserializeOwned + Clone + Send + Sync + 'static {}

impl<T> Entity for T where T: Identifiable + Serialize + DeserializeOwned + Clone + Send + Sync + 'static {}

/// Implements [`Identifiable`] by reading a string field.
#[macro_export]
macro_rules! identity_field {
    ($ty:ty, $field:ident) => {
        impl $crate::framework::Identifiable for $ty {
            fn id(&self) -> ::std::string::String {
                let id: &str = &self.$field;
                id.to_owned()
            }
        }
    };
}

/// Returns the identity of `entity`, failing if it cannot address a member.
///
/// Identity must pre-exist before a save; the framework never generates one.
pub fn identity_of<T: Identifiable>(entity: &T) -> Result<String, FrameworkError> {
    let id = entity.id();
    check_identity::<T>(&id)?;
    Ok(id)
}

/// Fails with [`FrameworkError::MissingIdentity`] unless `id` names exactly one
/// member of a collection.
///
/// Blank ids and the dot segments `.` and `..` would resolve to the collection
/// itself (or its parent) once placed in a URL path.
pub fn check_identity<T: ?Sized>(id: &str) -> Result<(), FrameworkError> {
    // URL parsing drops tabs and newlines before it looks at dot segments.
    let visible: String = id.chars().filter(|c| !matches!(c, '\t' | '\n' | '\r')).collect();
    if visible.trim().is_empty() || visible == "." || visible == ".." {
        return Err(FrameworkError::MissingIdentity {
            entity_type: short_type_name::<T>(),
        });
    }
    Ok(())
}

/// Extract just the type name (e.g., "Movie" instead of "fusion_recipe::model::movie::Movie").
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let path = full.split('<').next().unwrap_or(full);
    path.rsplit("::").next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ticket {
        #[allow(dead_code)]
        id: String,
        number: u32,
    }

    // Accessor wins even though a field called `id` exists.
    impl Identifiable for Ticket {
        fn id(&self) -> String {
            format!("T-{}", self.number)
        }
    }

    struct Seat {
        id: String,
    }

    crate::identity_field!(Seat, id);

    #[test]
    fn accessor_takes_precedence_over_field() {
        let ticket = Ticket {
            id: "field-value".into(),
            number: 7,
        };
        assert_eq!(identity_of(&ticket).unwrap(), "T-7");
    }

    #[test]
    fn field_macro_reads_string_field() {
        let seat = Seat { id: "12A".into() };
        assert_eq!(identity_of(&seat).unwrap(), "12A");
    }

    #[test]
    fn empty_identity_is_rejected() {
        let seat = Seat { id: "  ".into() };
        match identity_of(&seat) {
            Err(FrameworkError::MissingIdentity { entity_type }) => assert_eq!(entity_type, "Seat"),
            other => panic!("expected MissingIdentity, got {other:?}"),
        }
    }

    #[test]
    fn dot_segments_are_not_identities() {
        for id in ["", " ", ".", "..", ".\t", "\n.."] {
            assert!(
                matches!(check_identity::<Seat>(id), Err(FrameworkError::MissingIdentity { entity_type: "Seat" })),
                "{id:?} must be rejected"
            );
        }
        for id in ["42", "...", "a/b", ".hidden"] {
            assert!(check_identity::<Seat>(id).is_ok(), "{id:?} must be accepted");
        }
    }

    #[test]
    fn short_type_name_strips_module_path() {
        assert_eq!(short_type_name::<Seat>(), "Seat");
        assert_eq!(short_type_name::<Vec<Seat>>(), "Vec");
    }
}
