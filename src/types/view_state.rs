use serde::{Deserialize, Serialize};

use super::repo::Repo;

/// Which data source produced the repo list currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataOrigin {
    Remote,
    Cache,
}

/// Immutable snapshot rendered by the details screen.
///
/// Snapshots are published behind an `Arc` and replaced wholesale on every
/// update; only the view-model builds new ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub is_loading: bool,
    pub is_online: bool,
    pub is_offline_loaded: bool,
    pub repos: Vec<Repo>,
    pub followers_qty: u32,
    pub origin: Option<DataOrigin>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            is_loading: true,
            is_online: false,
            is_offline_loaded: false,
            repos: Vec::new(),
            followers_qty: 0,
            origin: None,
        }
    }
}

impl ViewState {
    /// True when the cache was read and held no repos for this author.
    pub fn is_offline_data_empty(&self) -> bool {
        self.is_offline_loaded && self.repos.is_empty()
    }

    /// Classifies the snapshot into exactly one screen phase.
    pub fn phase(&self) -> DetailsPhase {
        if !self.is_online && !self.is_offline_loaded {
            DetailsPhase::OfflineNoCache
        } else if self.is_offline_data_empty() {
            DetailsPhase::OfflineEmpty
        } else if self.is_loading {
            DetailsPhase::Loading
        } else if !self.is_online {
            DetailsPhase::OfflinePopulated
        } else if self.is_offline_loaded && self.origin == Some(DataOrigin::Cache) {
            DetailsPhase::OnlineStale
        } else {
            DetailsPhase::OnlinePopulated
        }
    }

    pub fn screen_mode(&self) -> ScreenMode {
        ScreenMode::from(self.phase())
    }
}

/// The six states the details screen moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailsPhase {
    /// Nothing loaded yet.
    Loading,
    /// Online and showing data fetched from the network.
    OnlinePopulated,
    /// Online but still showing cached data; no remote load has succeeded.
    OnlineStale,
    /// Offline and the cache has not been read.
    OfflineNoCache,
    /// Showing cached data while offline.
    OfflinePopulated,
    /// The cache was read and holds nothing for this author.
    OfflineEmpty,
}

/// The four mutually exclusive visual modes of the details screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenMode {
    /// Spinner.
    Loading,
    /// "No internet, nothing cached" placeholder.
    NoConnectivity,
    /// Empty-cache placeholder with a back/retry action.
    EmptyOfflineCache,
    /// Avatar, name, followers count and repo list.
    Populated,
}

impl From<DetailsPhase> for ScreenMode {
    fn from(phase: DetailsPhase) -> Self {
        match phase {
            DetailsPhase::Loading => ScreenMode::Loading,
            DetailsPhase::OfflineNoCache => ScreenMode::NoConnectivity,
            DetailsPhase::OfflineEmpty => ScreenMode::EmptyOfflineCache,
            DetailsPhase::OnlinePopulated
            | DetailsPhase::OnlineStale
            | DetailsPhase::OfflinePopulated => ScreenMode::Populated,
        }
    }
}
