use serde::{Deserialize, Serialize};

/// Top-level settings container, persisted as `settings.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DetailsSettings {
    pub api: ApiSettings,
    pub cache: CacheSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// HTTP client settings for the remote repository.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiSettings {
    pub user_agent: String,
    pub accept: String,
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            user_agent: format!("author-details/{}", env!("CARGO_PKG_VERSION")),
            accept: "application/vnd.github+json".to_string(),
            timeout_secs: 15,
        }
    }
}

/// Local cache settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CacheSettings {
    /// SQLite file path. Empty means `<data dir>/cache.db`.
    pub database_path: String,
}

/// Log filter used when `RUST_LOG` is not set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
