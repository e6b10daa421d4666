//! In-memory stand-ins for the remote and cache repositories.
//!
//! Both record every call, can be scripted to fail, and let tests wait for a
//! given number of calls. `MockRemoteRepository` can also hold responses
//! until released, to keep a load in flight; a held call answers with the
//! response scripted when it was made.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{watch, Notify, Semaphore};

use crate::managers::cache_repository::CacheRepository;
use crate::services::remote_repository::RemoteRepository;
use crate::types::errors::{CacheError, NetworkError};
use crate::types::repo::{Follower, Repo};

/// Record of a repository call.
#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    /// Method name, e.g. "fetch_repos"
    pub method: String,
    /// Arguments rendered as strings
    pub args: Vec<String>,
}

impl MockCall {
    pub fn new(method: &str, args: Vec<String>) -> Self {
        Self {
            method: method.to_string(),
            args,
        }
    }
}

#[derive(Default)]
struct CallLog {
    calls: Mutex<Vec<MockCall>>,
    notify: Notify,
}

impl CallLog {
    fn record(&self, method: &str, args: Vec<String>) {
        lock(&self.calls).push(MockCall::new(method, args));
        self.notify.notify_waiters();
    }

    fn count(&self, method: &str) -> usize {
        lock(&self.calls).iter().filter(|c| c.method == method).count()
    }

    async fn wait_for(&self, method: &str, n: usize) {
        loop {
            let notified = self.notify.notified();
            if self.count(method) >= n {
                return;
            }
            notified.await;
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|p| p.into_inner())
}

struct RemoteScript {
    repos: Result<Vec<Repo>, NetworkError>,
    followers: Result<Vec<Follower>, NetworkError>,
}

/// Scriptable `RemoteRepository`.
pub struct MockRemoteRepository {
    script: Mutex<RemoteScript>,
    gate: Mutex<Option<Arc<Semaphore>>>,
    log: CallLog,
}

impl Default for MockRemoteRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRemoteRepository {
    /// A remote that answers with no repos and no followers.
    pub fn new() -> Self {
        Self {
            script: Mutex::new(RemoteScript {
                repos: Ok(Vec::new()),
                followers: Ok(Vec::new()),
            }),
            gate: Mutex::new(None),
            log: CallLog::default(),
        }
    }

    pub fn with_repos(self, repos: Vec<Repo>) -> Self {
        self.set_repos(Ok(repos));
        self
    }

    /// Answers the subscriptions call with `count` followers.
    pub fn with_followers(self, count: usize) -> Self {
        self.set_followers(Ok(followers(count)));
        self
    }

    pub fn failing_repos(self, error: NetworkError) -> Self {
        self.set_repos(Err(error));
        self
    }

    pub fn failing_followers(self, error: NetworkError) -> Self {
        self.set_followers(Err(error));
        self
    }

    pub fn set_repos(&self, repos: Result<Vec<Repo>, NetworkError>) {
        lock(&self.script).repos = repos;
    }

    pub fn set_followers(&self, followers: Result<Vec<Follower>, NetworkError>) {
        lock(&self.script).followers = followers;
    }

    /// Makes every following call wait for a [`release`](Self::release).
    pub fn hold(&self) {
        *lock(&self.gate) = Some(Arc::new(Semaphore::new(0)));
    }

    /// Lets `n` held calls through.
    pub fn release(&self, n: usize) {
        if let Some(gate) = lock(&self.gate).as_ref() {
            gate.add_permits(n);
        }
    }

    pub fn calls(&self) -> Vec<MockCall> {
        lock(&self.log.calls).clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.log.count(method)
    }

    /// Resolves once `method` has been called at least `n` times.
    pub async fn wait_for_calls(&self, method: &str, n: usize) {
        self.log.wait_for(method, n).await
    }

    async fn pass_gate(&self) {
        let gate = lock(&self.gate).clone();
        if let Some(gate) = gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
    }
}

impl RemoteRepository for MockRemoteRepository {
    async fn fetch_repos(&self, repos_url: &str) -> Result<Vec<Repo>, NetworkError> {
        let response = lock(&self.script).repos.clone();
        self.log.record("fetch_repos", vec![repos_url.to_string()]);
        self.pass_gate().await;
        response
    }

    async fn fetch_followers(&self, subscriptions_url: &str) -> Result<Vec<Follower>, NetworkError> {
        let response = lock(&self.script).followers.clone();
        self.log.record("fetch_followers", vec![subscriptions_url.to_string()]);
        self.pass_gate().await;
        response
    }
}

/// Builds `count` distinct followers.
pub fn followers(count: usize) -> Vec<Follower> {
    (0..count)
        .map(|i| Follower {
            id: i as u64,
            login: format!("follower-{}", i),
        })
        .collect()
}

/// `CacheRepository` kept in hash maps.
pub struct MemoryCacheRepository {
    repos: Mutex<HashMap<String, Vec<Repo>>>,
    followers: Mutex<HashMap<String, u32>>,
    failure: Mutex<Option<CacheError>>,
    changes: watch::Sender<u64>,
    log: CallLog,
}

impl Default for MemoryCacheRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCacheRepository {
    pub fn new() -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            repos: Mutex::new(HashMap::new()),
            followers: Mutex::new(HashMap::new()),
            failure: Mutex::new(None),
            changes,
            log: CallLog::default(),
        }
    }

    /// Pre-populates the cache for `author_id`.
    pub fn seeded(self, author_id: &str, repos: Vec<Repo>, followers_qty: u32) -> Self {
        lock(&self.repos).insert(author_id.to_string(), repos);
        lock(&self.followers).insert(author_id.to_string(), followers_qty);
        self
    }

    /// Makes every following call fail with `error`.
    pub fn failing(self, error: CacheError) -> Self {
        *lock(&self.failure) = Some(error);
        self
    }

    pub fn cached_repos(&self, author_id: &str) -> Option<Vec<Repo>> {
        lock(&self.repos).get(author_id).cloned()
    }

    pub fn cached_followers(&self, author_id: &str) -> Option<u32> {
        lock(&self.followers).get(author_id).copied()
    }

    pub fn calls(&self) -> Vec<MockCall> {
        lock(&self.log.calls).clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.log.count(method)
    }

    pub async fn wait_for_calls(&self, method: &str, n: usize) {
        self.log.wait_for(method, n).await
    }

    fn check(&self) -> Result<(), CacheError> {
        match lock(&self.failure).as_ref() {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

impl CacheRepository for MemoryCacheRepository {
    async fn insert_repos(&self, repos: &[Repo], author_id: &str) -> Result<(), CacheError> {
        self.log
            .record("insert_repos", vec![author_id.to_string(), repos.len().to_string()]);
        self.check()?;
        lock(&self.repos).insert(author_id.to_string(), repos.to_vec());
        self.changes.send_modify(|version| *version += 1);
        Ok(())
    }

    async fn update_followers_count(&self, count: u32, author_id: &str) -> Result<(), CacheError> {
        self.log
            .record("update_followers_count", vec![author_id.to_string(), count.to_string()]);
        self.check()?;
        lock(&self.followers).insert(author_id.to_string(), count);
        self.changes.send_modify(|version| *version += 1);
        Ok(())
    }

    async fn get_repos_by_author_id(&self, author_id: &str) -> Result<Vec<Repo>, CacheError> {
        self.log.record("get_repos_by_author_id", vec![author_id.to_string()]);
        self.check()?;
        Ok(lock(&self.repos).get(author_id).cloned().unwrap_or_default())
    }

    async fn get_followers_count_by_author_id(&self, author_id: &str) -> Result<u32, CacheError> {
        self.log
            .record("get_followers_count_by_author_id", vec![author_id.to_string()]);
        self.check()?;
        Ok(lock(&self.followers).get(author_id).copied().unwrap_or(0))
    }

    fn subscribe_changes(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }
}
