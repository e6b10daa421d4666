use serde::{Deserialize, Deserializer, Serialize};

/// The profile entity a details screen displays.
///
/// Field names follow the GitHub users payload, so an `Author` can be
/// deserialized straight from a search or list response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub login: String,
    pub avatar_url: String,
    pub repos_url: String,
    pub subscriptions_url: String,
}

impl Author {
    /// Builds an author whose endpoints hang off `api_base`, mirroring the
    /// URL layout of the GitHub users API.
    pub fn with_api_base(id: &str, login: &str, api_base: &str) -> Self {
        let base = api_base.trim_end_matches('/');
        Self {
            id: id.to_string(),
            login: login.to_string(),
            avatar_url: format!("{}/avatars/{}", base, login),
            repos_url: format!("{}/users/{}/repos", base, login),
            subscriptions_url: format!("{}/users/{}/subscriptions", base, login),
        }
    }
}

// GitHub sends numeric ids; cached or hand-built authors carry strings.
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}
