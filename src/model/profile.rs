use serde::{Deserialize, Serialize};

/// The signed-in user's profile. Exists at most once, served under `/profile`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub favourites: Vec<String>,
}
