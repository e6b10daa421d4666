use serde::{Deserialize, Serialize};

/// A named repository belonging to an author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repo {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

impl Repo {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            html_url: None,
        }
    }
}

/// An entry of the subscriptions endpoint. Only the count is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follower {
    #[serde(default)]
    pub id: u64,
    #[serde(default, alias = "name")]
    pub login: String,
}
