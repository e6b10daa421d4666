//! App core for the details screen host.
//!
//! Wires settings, the cache database, the HTTP client and connectivity
//! together, and owns the details screen that is currently open.

use std::sync::Arc;

use log::{debug, info};
use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;

use crate::database::connection::Database;
use crate::managers::cache_repository::SqliteCacheRepository;
use crate::managers::connectivity::ConnectivityMonitor;
use crate::managers::details_view_model::{DetailsViewModel, StateStream};
use crate::services::remote_repository::HttpRemoteRepository;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::types::author::Author;
use crate::types::errors::AppError;
use crate::types::view_state::ViewState;

/// The view-model as wired against the real repositories.
pub type AppDetailsViewModel = DetailsViewModel<HttpRemoteRepository, SqliteCacheRepository>;

/// Central application struct holding the collaborators of a details screen.
pub struct App {
    pub db: Arc<Database>,
    pub settings_engine: SettingsEngine,
    pub remote: Arc<HttpRemoteRepository>,
    pub cache: Arc<SqliteCacheRepository>,
    pub connectivity: ConnectivityMonitor,
    screen: Option<AppDetailsViewModel>,
    event_sink: Option<UnboundedSender<Value>>,
}

impl App {
    /// Loads settings, opens the cache database and builds the HTTP client.
    pub fn new(mut settings_engine: SettingsEngine) -> Result<Self, AppError> {
        let settings = settings_engine.load()?;

        let db_path = settings_engine.database_path();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Database(e.to_string()))?;
        }
        let db = Arc::new(Database::open(&db_path)?);
        info!("Cache database at {}", db_path.display());

        let remote = HttpRemoteRepository::new(&settings.api)
            .map_err(|e| AppError::Http(e.to_string()))?;
        let cache = SqliteCacheRepository::new(db.clone());

        Ok(Self {
            db,
            settings_engine,
            remote: Arc::new(remote),
            cache: Arc::new(cache),
            connectivity: ConnectivityMonitor::new(false),
            screen: None,
            event_sink: None,
        })
    }

    /// Sets where unsolicited host events (state pushes) are sent.
    pub fn set_event_sink(&mut self, sink: UnboundedSender<Value>) {
        self.event_sink = Some(sink);
    }

    pub fn event_sink(&self) -> Option<&UnboundedSender<Value>> {
        self.event_sink.as_ref()
    }

    /// Changes one setting by dotted key and persists it.
    ///
    /// `api.*` keys rebuild the HTTP client for screens opened afterwards; an
    /// open screen keeps its client until reopened. `logging.level` takes
    /// effect on the next start.
    pub fn set_setting(&mut self, key: &str, value: Value) -> Result<(), AppError> {
        self.settings_engine.set_value(key, value)?;
        if key.starts_with("api.") {
            let settings = self.settings_engine.get_settings();
            let remote = HttpRemoteRepository::new(&settings.api)
                .map_err(|e| AppError::Http(e.to_string()))?;
            self.remote = Arc::new(remote);
            debug!("Rebuilt HTTP client after {} changed", key);
        }
        Ok(())
    }

    /// Opens the details screen for `author`, replacing any open one.
    ///
    /// When starting offline the last cached data is requested right away.
    /// Must be called from within a Tokio runtime.
    pub fn open_details(&mut self, author: Author, is_online: bool) -> Arc<ViewState> {
        self.close_details();
        self.connectivity.set_online(is_online);

        info!("Opening details for {} (online={})", author.login, is_online);
        let view_model = DetailsViewModel::new(
            author,
            self.remote.clone(),
            self.cache.clone(),
            is_online,
        );
        if !is_online {
            view_model.load_last_data();
        }
        let state = view_model.current_state();
        self.screen = Some(view_model);
        state
    }

    /// Records connectivity and forwards it to the open screen.
    ///
    /// Every report reaches the screen, so repeating "online" retries the load.
    pub fn update_network_status(&self, is_online: bool) {
        self.connectivity.set_online(is_online);
        if let Some(view_model) = &self.screen {
            view_model.update_network_status(is_online);
        }
    }

    pub fn is_online(&self) -> bool {
        self.connectivity.is_online()
    }

    pub fn load_last_data(&self) -> Result<(), AppError> {
        self.view_model()?.load_last_data();
        Ok(())
    }

    pub fn details_state(&self) -> Result<Arc<ViewState>, AppError> {
        Ok(self.view_model()?.current_state())
    }

    pub fn observe_details(&self) -> Result<StateStream, AppError> {
        Ok(self.view_model()?.observe_state())
    }

    pub fn view_model(&self) -> Result<&AppDetailsViewModel, AppError> {
        self.screen.as_ref().ok_or(AppError::NoActiveScreen)
    }

    /// Closes the open screen, if any. Returns whether one was open.
    pub fn close_details(&mut self) -> bool {
        match self.screen.take() {
            Some(view_model) => {
                info!("Closed details for {}", view_model.author().login);
                true
            }
            None => false,
        }
    }
}
