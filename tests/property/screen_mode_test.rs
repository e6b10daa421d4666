//! Property-based tests for screen classification.
//!
//! For every reachable combination of flags, repos and origin, a snapshot
//! falls into exactly one screen mode, and the derived offline-empty flag
//! always agrees with the fields it is computed from.

use author_details::types::repo::Repo;
use author_details::types::view_state::{DataOrigin, DetailsPhase, ScreenMode, ViewState};
use proptest::prelude::*;

fn arb_origin() -> impl Strategy<Value = Option<DataOrigin>> {
    prop_oneof![
        Just(None),
        Just(Some(DataOrigin::Remote)),
        Just(Some(DataOrigin::Cache)),
    ]
}

fn arb_view_state() -> impl Strategy<Value = ViewState> {
    (
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        prop::collection::vec("[a-z][a-z0-9-]{0,12}", 0..5),
        any::<u32>(),
        arb_origin(),
    )
        .prop_map(
            |(is_loading, is_online, is_offline_loaded, names, followers_qty, origin)| ViewState {
                is_loading,
                is_online,
                is_offline_loaded,
                repos: names.iter().map(|n| Repo::new(n)).collect(),
                followers_qty,
                origin,
            },
        )
}

proptest! {
    #[test]
    fn exactly_one_screen_mode_applies(state in arb_view_state()) {
        let no_connectivity = !state.is_online && !state.is_offline_loaded;
        let empty_cache = state.is_offline_loaded && state.repos.is_empty();
        let loading = state.is_loading;

        let candidates = [
            (ScreenMode::NoConnectivity, no_connectivity),
            (ScreenMode::EmptyOfflineCache, !no_connectivity && empty_cache),
            (ScreenMode::Loading, !no_connectivity && !empty_cache && loading),
            (ScreenMode::Populated, !no_connectivity && !empty_cache && !loading),
        ];
        let matching: Vec<ScreenMode> = candidates
            .iter()
            .filter(|(_, applies)| *applies)
            .map(|(mode, _)| *mode)
            .collect();

        prop_assert_eq!(matching.len(), 1);
        prop_assert_eq!(state.screen_mode(), matching[0]);
    }

    #[test]
    fn offline_data_empty_is_derived(state in arb_view_state()) {
        prop_assert_eq!(
            state.is_offline_data_empty(),
            state.is_offline_loaded && state.repos.is_empty()
        );
    }

    #[test]
    fn followers_count_never_affects_mode(state in arb_view_state(), other in any::<u32>()) {
        let mut changed = state.clone();
        changed.followers_qty = other;
        prop_assert_eq!(state.phase(), changed.phase());
    }

    #[test]
    fn stale_phase_only_when_showing_cache_online(state in arb_view_state()) {
        if state.phase() == DetailsPhase::OnlineStale {
            prop_assert!(state.is_online);
            prop_assert!(state.is_offline_loaded);
            prop_assert!(!state.repos.is_empty());
            prop_assert_eq!(state.origin, Some(DataOrigin::Cache));
        }
    }
}
