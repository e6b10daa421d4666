//! author-details demo mode.
//!
//! Walks one details screen through its phases against scripted in-memory
//! repositories, then shows the SQLite cache and settings layers. Nothing
//! here touches the network.

use std::sync::Arc;
use std::time::Duration;

use author_details::managers::details_view_model::{DetailsViewModel, StateStream};
use author_details::testing::{MemoryCacheRepository, MockRemoteRepository};
use author_details::types::author::Author;
use author_details::types::repo::Repo;
use author_details::types::view_state::ViewState;

fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  📦 {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

fn show(label: &str, state: &ViewState) {
    let names: Vec<&str> = state.repos.iter().map(|r| r.name.as_str()).collect();
    println!(
        "  {:<22} mode={:?} phase={:?} online={} followers={} repos=[{}]",
        label,
        state.screen_mode(),
        state.phase(),
        state.is_online,
        state.followers_qty,
        names.join(", ")
    );
}

async fn settle(stream: &mut StateStream, pred: impl FnMut(&ViewState) -> bool) -> Arc<ViewState> {
    match tokio::time::timeout(Duration::from_secs(2), stream.wait_for(pred)).await {
        Ok(Some(state)) => state,
        _ => stream.current(),
    }
}

#[tokio::main]
async fn main() {
    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║            author-details v{} — Demo Mode               ║", env!("CARGO_PKG_VERSION"));
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    demo_cold_start_offline().await;
    demo_online_refresh().await;
    demo_cache_layer().await;
    demo_settings();

    println!("═══════════════════════════════════════════════════════════════");
    println!("  ✅ Demo finished");
    println!("═══════════════════════════════════════════════════════════════");
}

async fn demo_cold_start_offline() {
    section("Offline cold start");
    let author = Author::with_api_base("1", "octocat", "https://api.github.com");

    let empty = DetailsViewModel::new(
        author.clone(),
        Arc::new(MockRemoteRepository::new()),
        Arc::new(MemoryCacheRepository::new()),
        false,
    );
    let mut stream = empty.observe_state();
    show("before cache read", &stream.current());
    empty.load_last_data();
    show("empty cache", &*settle(&mut stream, |s| s.is_offline_loaded).await);

    let cached = DetailsViewModel::new(
        author,
        Arc::new(MockRemoteRepository::new()),
        Arc::new(MemoryCacheRepository::new().seeded(
            "1",
            vec![Repo::new("hello-world"), Repo::new("spoon-knife")],
            12,
        )),
        false,
    );
    let mut stream = cached.observe_state();
    cached.load_last_data();
    show("cache hit", &*settle(&mut stream, |s| s.is_offline_loaded).await);
    println!();
}

async fn demo_online_refresh() {
    section("Going online");
    let remote = Arc::new(
        MockRemoteRepository::new()
            .with_repos(vec![Repo::new("hello-world"), Repo::new("linguist")])
            .with_followers(3),
    );
    let cache = Arc::new(MemoryCacheRepository::new().seeded("1", vec![Repo::new("hello-world")], 1));
    let vm = DetailsViewModel::new(
        Author::with_api_base("1", "octocat", "https://api.github.com"),
        remote.clone(),
        cache.clone(),
        false,
    );
    let mut stream = vm.observe_state();

    vm.load_last_data();
    show("offline", &*settle(&mut stream, |s| s.is_offline_loaded).await);

    vm.update_network_status(true);
    show("online, refreshed", &*settle(&mut stream, |s| s.followers_qty == 3).await);
    let _ = tokio::time::timeout(Duration::from_secs(2), cache.wait_for_calls("update_followers_count", 1)).await;
    println!(
        "  Cache now holds {} repos and {:?} followers",
        cache.cached_repos("1").map(|r| r.len()).unwrap_or(0),
        cache.cached_followers("1")
    );

    vm.update_network_status(false);
    show("offline again", &*settle(&mut stream, |s| !s.is_online).await);
    println!("  Remote calls: {}", remote.calls().len());
    println!();
}

async fn demo_cache_layer() {
    use author_details::database::connection::Database;
    use author_details::managers::cache_repository::{CacheRepository, SqliteCacheRepository};
    section("SQLite cache");

    let db = match Database::open_in_memory() {
        Ok(db) => Arc::new(db),
        Err(e) => {
            println!("  ✗ Failed to open database: {}", e);
            return;
        }
    };
    let cache = SqliteCacheRepository::new(db);
    let repos = vec![Repo::new("zeta"), Repo::new("alpha")];
    if let Err(e) = cache.insert_repos(&repos, "1").await {
        println!("  ✗ insert_repos failed: {}", e);
        return;
    }
    if let Err(e) = cache.update_followers_count(7, "1").await {
        println!("  ✗ update_followers_count failed: {}", e);
        return;
    }

    let stored = cache.get_repos_by_author_id("1").await.unwrap_or_default();
    let followers = cache.get_followers_count_by_author_id("1").await.unwrap_or(0);
    let names: Vec<&str> = stored.iter().map(|r| r.name.as_str()).collect();
    println!("  Stored repos (in order): {}", names.join(", "));
    println!("  Stored followers: {}", followers);
    println!("  ✓ Cache OK");
    println!();
}

fn demo_settings() {
    use author_details::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
    section("Settings Engine");

    let engine = SettingsEngine::new(None);
    let settings = engine.get_settings();
    println!("  Config file: {}", engine.get_config_path());
    println!("  Cache database: {}", engine.database_path().display());
    println!("  User-Agent: {}", settings.api.user_agent);
    println!("  Timeout: {}s", settings.api.timeout_secs);
    println!();
}
