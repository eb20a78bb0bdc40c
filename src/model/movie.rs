use serde::{Deserialize, Serialize};

/// A movie, served under `/movies/{ID}`.
///
/// # Identity
/// Uses the conventional `id` field through [`identity_field!`](crate::identity_field),
/// so [`RestRepository<Movie>`](crate::rest::RestRepository) can build paths without
/// a hand-written accessor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Title")]
    pub title: String,
}

crate::identity_field!(Movie, id);

impl Movie {
    /// Creates a new Movie instance.
    ///
    /// # Arguments
    /// * `id` - Unique identifier; must be set before saving
    /// * `title` - Display title
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::identity_of;

    #[test]
    fn wire_format_uses_upper_case_keys() {
        let json = serde_json::to_string(&Movie::new("42", "Dune")).unwrap();
        assert_eq!(json, r#"{"ID":"42","Title":"Dune"}"#);
    }

    #[test]
    fn identity_is_the_id_field() {
        assert_eq!(identity_of(&Movie::new("42", "Dune")).unwrap(), "42");
    }
}
