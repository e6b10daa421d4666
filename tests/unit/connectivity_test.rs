//! Unit tests for `ConnectivityMonitor` and view-models following it.

use std::sync::Arc;
use std::time::Duration;

use author_details::managers::connectivity::ConnectivityMonitor;
use author_details::managers::details_view_model::DetailsViewModel;
use author_details::testing::{MemoryCacheRepository, MockRemoteRepository};
use author_details::types::author::Author;
use author_details::types::repo::Repo;
use tokio::time::{sleep, timeout};

const WAIT: Duration = Duration::from_secs(5);

fn view_model(
    online: bool,
) -> (
    DetailsViewModel<MockRemoteRepository, MemoryCacheRepository>,
    Arc<MockRemoteRepository>,
) {
    let remote = Arc::new(MockRemoteRepository::new().with_repos(vec![Repo::new("a")]));
    let cache = Arc::new(MemoryCacheRepository::new());
    let vm = DetailsViewModel::new(
        Author::with_api_base("42", "octocat", "https://api.test"),
        remote.clone(),
        cache,
        online,
    );
    (vm, remote)
}

#[tokio::test]
async fn test_subscribers_see_transitions() {
    let monitor = ConnectivityMonitor::new(false);
    let mut rx = monitor.subscribe();

    assert!(monitor.set_online(true));
    timeout(WAIT, rx.changed()).await.unwrap().unwrap();
    assert!(*rx.borrow_and_update());

    assert!(!monitor.set_online(true));
    assert!(!rx.has_changed().unwrap());
}

#[tokio::test]
async fn test_following_monitor_loads_when_going_online() {
    let monitor = ConnectivityMonitor::new(false);
    let (vm, remote) = view_model(false);
    let _task = vm.follow_connectivity(monitor.subscribe());

    monitor.set_online(true);
    timeout(WAIT, remote.wait_for_calls("fetch_repos", 1)).await.unwrap();

    let mut stream = vm.observe_state();
    let state = timeout(WAIT, stream.wait_for(|s| s.is_online && !s.is_loading))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(state.repos, vec![Repo::new("a")]);

    monitor.set_online(false);
    let state = timeout(WAIT, stream.wait_for(|s| !s.is_online)).await.unwrap().unwrap();
    assert_eq!(state.repos, vec![Repo::new("a")]);
    assert_eq!(remote.call_count("fetch_repos"), 1);
}

#[tokio::test]
async fn test_follow_applies_current_monitor_value() {
    let monitor = ConnectivityMonitor::new(true);
    let (vm, remote) = view_model(false);

    let _task = vm.follow_connectivity(monitor.subscribe());

    assert!(vm.current_state().is_online);
    timeout(WAIT, remote.wait_for_calls("fetch_repos", 1)).await.unwrap();
}

#[tokio::test]
async fn test_follow_skips_matching_initial_value() {
    let monitor = ConnectivityMonitor::new(false);
    let (vm, remote) = view_model(false);

    let _task = vm.follow_connectivity(monitor.subscribe());
    sleep(Duration::from_millis(50)).await;

    assert!(remote.calls().is_empty());
    assert!(!vm.current_state().is_online);
}

#[tokio::test]
async fn test_follow_task_ends_after_view_model_is_dropped() {
    let monitor = ConnectivityMonitor::new(false);
    let (vm, remote) = view_model(false);
    let task = vm.follow_connectivity(monitor.subscribe());

    drop(vm);
    monitor.set_online(true);

    timeout(WAIT, task).await.expect("task should end").unwrap();
    assert_eq!(remote.call_count("fetch_repos"), 0);
}

#[tokio::test]
async fn test_follow_task_ends_when_monitor_is_dropped() {
    let monitor = ConnectivityMonitor::new(false);
    let (vm, _remote) = view_model(false);
    let task = vm.follow_connectivity(monitor.subscribe());

    drop(monitor);

    timeout(WAIT, task).await.expect("task should end").unwrap();
    assert!(!vm.current_state().is_online);
}
