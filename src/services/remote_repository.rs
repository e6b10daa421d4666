//! Remote repository for author data.
//!
//! Fetches an author's repos and subscriptions from the GitHub-style REST API
//! using `reqwest`.

use std::future::Future;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::types::errors::NetworkError;
use crate::types::repo::{Follower, Repo};
use crate::types::settings::ApiSettings;

/// Trait defining the network calls the details screen needs.
pub trait RemoteRepository: Send + Sync + 'static {
    fn fetch_repos(&self, repos_url: &str)
        -> impl Future<Output = Result<Vec<Repo>, NetworkError>> + Send;

    fn fetch_followers(
        &self,
        subscriptions_url: &str,
    ) -> impl Future<Output = Result<Vec<Follower>, NetworkError>> + Send;
}

/// Remote repository backed by a shared `reqwest::Client`.
pub struct HttpRemoteRepository {
    client: Client,
}

impl HttpRemoteRepository {
    /// Builds the HTTP client from the API settings.
    pub fn new(settings: &ApiSettings) -> Result<Self, NetworkError> {
        let mut headers = HeaderMap::new();
        let accept = HeaderValue::from_str(&settings.accept)
            .map_err(|e| NetworkError::Request(format!("invalid accept header: {}", e)))?;
        headers.insert(ACCEPT, accept);

        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| NetworkError::Request(e.to_string()))?;

        Ok(Self { client })
    }

    /// Wraps an existing client, e.g. one shared with other screens.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, NetworkError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| NetworkError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::Status(status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| NetworkError::Decode(e.to_string()))
    }
}

impl RemoteRepository for HttpRemoteRepository {
    async fn fetch_repos(&self, repos_url: &str) -> Result<Vec<Repo>, NetworkError> {
        self.get_json(repos_url).await
    }

    async fn fetch_followers(&self, subscriptions_url: &str) -> Result<Vec<Follower>, NetworkError> {
        self.get_json(subscriptions_url).await
    }
}
