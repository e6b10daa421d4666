//! Details view-model for one author.
//!
//! Owns the `ViewState` stream of a details screen and decides where data
//! comes from: the remote repository while online, the local cache when the
//! host asks for the last known data. A cache load keeps following cache
//! writes until the next load replaces it. Remote and cache failures are logged
//! and absorbed; the screen only ever sees stale, default or empty data.
//!
//! Each load runs as a single spawned task covering all of its steps.
//! Starting a new load aborts the one in flight, and a superseded load never
//! publishes.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use log::{debug, error, info, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::managers::cache_repository::CacheRepository;
use crate::services::remote_repository::RemoteRepository;
use crate::types::author::Author;
use crate::types::repo::Repo;
use crate::types::view_state::{DataOrigin, ViewState};

/// Replay-latest subscription to a view-model's state.
///
/// A new subscriber sees the most recent snapshot first.
#[derive(Clone)]
pub struct StateStream {
    rx: watch::Receiver<Arc<ViewState>>,
}

impl StateStream {
    /// Latest published snapshot.
    pub fn current(&self) -> Arc<ViewState> {
        Arc::clone(&*self.rx.borrow())
    }

    /// Waits for the next snapshot. Returns `None` once the view-model is gone.
    pub async fn changed(&mut self) -> Option<Arc<ViewState>> {
        self.rx.changed().await.ok()?;
        Some(Arc::clone(&*self.rx.borrow_and_update()))
    }

    /// Waits until a snapshot satisfies `pred`, checking the current one first.
    pub async fn wait_for<F>(&mut self, mut pred: F) -> Option<Arc<ViewState>>
    where
        F: FnMut(&ViewState) -> bool,
    {
        let snapshot = self.rx.wait_for(|state| pred(&**state)).await.ok()?;
        Some(Arc::clone(&*snapshot))
    }
}

#[derive(Debug, Clone, Copy)]
enum LoadKind {
    Online,
    Offline,
}

struct Shared<R, C> {
    author: Author,
    remote: Arc<R>,
    cache: Arc<C>,
    state: watch::Sender<Arc<ViewState>>,
    generation: AtomicU64,
    in_flight: Mutex<Option<JoinHandle<()>>>,
    closed: AtomicBool,
}

impl<R, C> Shared<R, C> {
    fn is_current(&self, generation: u64) -> bool {
        !self.closed.load(Ordering::SeqCst) && self.generation.load(Ordering::SeqCst) == generation
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Read-copy-replace of the current snapshot.
    ///
    /// With `Some(generation)` the update is dropped unless that load is still
    /// the current one. Updates that change nothing are not published.
    fn publish<F>(&self, generation: Option<u64>, update: F) -> bool
    where
        F: FnOnce(&mut ViewState),
    {
        self.state.send_if_modified(|slot| {
            if let Some(generation) = generation {
                if !self.is_current(generation) {
                    return false;
                }
            }
            let mut next = ViewState::clone(slot);
            update(&mut next);
            if next == **slot {
                return false;
            }
            *slot = Arc::new(next);
            true
        })
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.generation.fetch_add(1, Ordering::SeqCst);
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(handle) = in_flight.take() {
            handle.abort();
        }
    }
}

impl<R: RemoteRepository, C: CacheRepository> Shared<R, C> {
    fn update_network_status(self: &Arc<Self>, is_online: bool) {
        debug!("Network status for author {}: online={}", self.author.id, is_online);
        self.publish(None, |state| state.is_online = is_online);
        if is_online {
            self.start_load(LoadKind::Online);
        }
    }

    fn start_load(self: &Arc<Self>, kind: LoadKind) {
        if self.is_closed() {
            return;
        }
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(previous) = in_flight.take() {
            if !previous.is_finished() {
                debug!("Superseding in-flight load for author {}", self.author.id);
            }
            previous.abort();
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let shared = Arc::clone(self);
        *in_flight = Some(tokio::spawn(async move {
            match kind {
                LoadKind::Online => shared.load_online(generation).await,
                LoadKind::Offline => shared.load_offline(generation).await,
            }
        }));
    }

    async fn load_online(&self, generation: u64) {
        let author = &self.author;

        let repos = match self.remote.fetch_repos(&author.repos_url).await {
            Ok(repos) => repos,
            Err(e) => {
                warn!("Error while loading repos for {}: {}", author.login, e);
                return;
            }
        };
        if !self.is_current(generation) {
            return;
        }
        if repos.is_empty() {
            warn!(
                "Received empty repo list for {}; the API may have dropped entries",
                author.login
            );
        }

        self.publish(Some(generation), |state| {
            state.repos = repos.clone();
            state.is_loading = false;
            state.origin = Some(DataOrigin::Remote);
        });
        if let Err(e) = self.cache.insert_repos(&repos, &author.id).await {
            error!("Failed to cache repos for {}: {}", author.id, e);
        }

        if !self.is_current(generation) {
            return;
        }
        let followers = match self.remote.fetch_followers(&author.subscriptions_url).await {
            Ok(followers) => followers,
            Err(e) => {
                warn!("Error while loading followers for {}: {}", author.login, e);
                return;
            }
        };
        if !self.is_current(generation) {
            return;
        }

        let count = u32::try_from(followers.len()).unwrap_or(u32::MAX);
        self.publish(Some(generation), |state| state.followers_qty = count);
        if let Err(e) = self.cache.update_followers_count(count, &author.id).await {
            error!("Failed to cache followers count for {}: {}", author.id, e);
        }
    }

    /// Reads the cache, publishes, then re-reads after every cache write
    /// until a newer load supersedes this one.
    async fn load_offline(&self, generation: u64) {
        let mut changes = self.cache.subscribe_changes();
        changes.borrow_and_update();

        loop {
            if let Some((repos, followers_qty)) = self.read_cache().await {
                if !self.is_current(generation) {
                    return;
                }
                self.publish(Some(generation), |state| {
                    state.is_loading = false;
                    state.repos = repos;
                    state.followers_qty = followers_qty;
                    state.is_offline_loaded = true;
                    state.origin = Some(DataOrigin::Cache);
                });
            }
            if changes.changed().await.is_err() {
                return;
            }
            debug!("Cache changed, re-reading author {}", self.author.id);
        }
    }

    async fn read_cache(&self) -> Option<(Vec<Repo>, u32)> {
        let author_id = &self.author.id;

        let repos = match self.cache.get_repos_by_author_id(author_id).await {
            Ok(repos) => repos,
            Err(e) => {
                error!("Error while reading cached repos for {}: {}", author_id, e);
                return None;
            }
        };
        let followers_qty = match self.cache.get_followers_count_by_author_id(author_id).await {
            Ok(count) => count,
            Err(e) => {
                error!("Error while reading cached followers for {}: {}", author_id, e);
                return None;
            }
        };
        if repos.is_empty() {
            info!("No cached repos for author {}", author_id);
        }
        Some((repos, followers_qty))
    }
}

/// View-model of the details screen for a single author.
///
/// Dropping it aborts the in-flight load and closes every `StateStream`
/// once that load has unwound.
pub struct DetailsViewModel<R, C> {
    shared: Arc<Shared<R, C>>,
}

impl<R: RemoteRepository, C: CacheRepository> DetailsViewModel<R, C> {
    /// Creates the view-model and applies the initial connectivity, which
    /// starts an online load right away when `is_online_at_start` is true.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(author: Author, remote: Arc<R>, cache: Arc<C>, is_online_at_start: bool) -> Self {
        let (state, _) = watch::channel(Arc::new(ViewState::default()));
        let shared = Arc::new(Shared {
            author,
            remote,
            cache,
            state,
            generation: AtomicU64::new(0),
            in_flight: Mutex::new(None),
            closed: AtomicBool::new(false),
        });
        shared.update_network_status(is_online_at_start);
        Self { shared }
    }

    pub fn author(&self) -> &Author {
        &self.shared.author
    }

    /// Subscribes to state snapshots.
    pub fn observe_state(&self) -> StateStream {
        StateStream {
            rx: self.shared.state.subscribe(),
        }
    }

    pub fn current_state(&self) -> Arc<ViewState> {
        Arc::clone(&*self.shared.state.borrow())
    }

    /// Records the new connectivity and, when online, starts an online load.
    ///
    /// Every online report triggers a fresh load, even when already online,
    /// so a repeated report acts as a retry.
    pub fn update_network_status(&self, is_online: bool) {
        self.shared.update_network_status(is_online);
    }

    /// Loads the last cached data for this author, regardless of connectivity.
    pub fn load_last_data(&self) {
        debug!("Loading cached data for author {}", self.shared.author.id);
        self.shared.start_load(LoadKind::Offline);
    }

    /// Forwards connectivity transitions from `rx` to
    /// [`update_network_status`](Self::update_network_status).
    ///
    /// The current value of `rx` is applied first if it differs from the
    /// screen's. The task ends when the monitor closes or this view-model is
    /// dropped.
    pub fn follow_connectivity(&self, mut rx: watch::Receiver<bool>) -> JoinHandle<()> {
        let weak = Arc::downgrade(&self.shared);
        let initial = *rx.borrow_and_update();
        if initial != self.shared.state.borrow().is_online {
            self.shared.update_network_status(initial);
        }
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let is_online = *rx.borrow_and_update();
                let Some(shared) = weak.upgrade() else {
                    break;
                };
                if shared.is_closed() {
                    break;
                }
                shared.update_network_status(is_online);
            }
        })
    }
}

impl<R, C> Drop for DetailsViewModel<R, C> {
    fn drop(&mut self) {
        self.shared.close();
    }
}
