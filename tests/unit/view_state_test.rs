//! Unit tests for `ViewState` classification into phases and screen modes.

use author_details::types::repo::Repo;
use author_details::types::view_state::{DataOrigin, DetailsPhase, ScreenMode, ViewState};
use rstest::rstest;

fn state(
    is_loading: bool,
    is_online: bool,
    is_offline_loaded: bool,
    repo_count: usize,
    origin: Option<DataOrigin>,
) -> ViewState {
    ViewState {
        is_loading,
        is_online,
        is_offline_loaded,
        repos: (0..repo_count).map(|i| Repo::new(&format!("repo-{}", i))).collect(),
        followers_qty: 0,
        origin,
    }
}

#[test]
fn test_default_state() {
    let s = ViewState::default();
    assert!(s.is_loading);
    assert!(!s.is_online);
    assert!(!s.is_offline_loaded);
    assert!(s.repos.is_empty());
    assert_eq!(s.followers_qty, 0);
    assert_eq!(s.origin, None);
    assert!(!s.is_offline_data_empty());
}

#[rstest]
#[case::fresh_offline(true, false, false, 0, None, DetailsPhase::OfflineNoCache)]
#[case::offline_after_remote(false, false, false, 2, Some(DataOrigin::Remote), DetailsPhase::OfflineNoCache)]
#[case::online_waiting(true, true, false, 0, None, DetailsPhase::Loading)]
#[case::online_loaded(false, true, false, 2, Some(DataOrigin::Remote), DetailsPhase::OnlinePopulated)]
#[case::online_loaded_empty(false, true, false, 0, Some(DataOrigin::Remote), DetailsPhase::OnlinePopulated)]
#[case::online_showing_cache(false, true, true, 1, Some(DataOrigin::Cache), DetailsPhase::OnlineStale)]
#[case::online_cache_origin_without_cache_read(false, true, false, 0, Some(DataOrigin::Cache), DetailsPhase::OnlinePopulated)]
#[case::online_refreshed_after_cache(false, true, true, 3, Some(DataOrigin::Remote), DetailsPhase::OnlinePopulated)]
#[case::offline_cache_hit(false, false, true, 1, Some(DataOrigin::Cache), DetailsPhase::OfflinePopulated)]
#[case::offline_cache_empty(false, false, true, 0, Some(DataOrigin::Cache), DetailsPhase::OfflineEmpty)]
#[case::online_cache_empty(false, true, true, 0, Some(DataOrigin::Cache), DetailsPhase::OfflineEmpty)]
fn test_phase(
    #[case] is_loading: bool,
    #[case] is_online: bool,
    #[case] is_offline_loaded: bool,
    #[case] repo_count: usize,
    #[case] origin: Option<DataOrigin>,
    #[case] expected: DetailsPhase,
) {
    let s = state(is_loading, is_online, is_offline_loaded, repo_count, origin);
    assert_eq!(s.phase(), expected);
}

#[rstest]
#[case(DetailsPhase::Loading, ScreenMode::Loading)]
#[case(DetailsPhase::OfflineNoCache, ScreenMode::NoConnectivity)]
#[case(DetailsPhase::OfflineEmpty, ScreenMode::EmptyOfflineCache)]
#[case(DetailsPhase::OnlinePopulated, ScreenMode::Populated)]
#[case(DetailsPhase::OnlineStale, ScreenMode::Populated)]
#[case(DetailsPhase::OfflinePopulated, ScreenMode::Populated)]
fn test_phase_to_screen_mode(#[case] phase: DetailsPhase, #[case] mode: ScreenMode) {
    assert_eq!(ScreenMode::from(phase), mode);
}

#[test]
fn test_no_connectivity_wins_over_loading() {
    let s = state(true, false, false, 0, None);
    assert_eq!(s.screen_mode(), ScreenMode::NoConnectivity);
}

#[test]
fn test_empty_offline_cache_wins_over_loading() {
    let s = state(true, false, true, 0, None);
    assert!(s.is_offline_data_empty());
    assert_eq!(s.screen_mode(), ScreenMode::EmptyOfflineCache);
}

#[test]
fn test_serialized_names_are_snake_case() {
    let json = serde_json::to_value(state(false, true, true, 0, Some(DataOrigin::Cache))).unwrap();
    assert_eq!(json["origin"], "cache");
    assert_eq!(
        serde_json::to_value(DetailsPhase::OfflineNoCache).unwrap(),
        "offline_no_cache"
    );
    assert_eq!(
        serde_json::to_value(ScreenMode::EmptyOfflineCache).unwrap(),
        "empty_offline_cache"
    );
}
