// Details screen state managers
// Managers own stateful pieces: the view-model, the local cache and connectivity.

pub mod cache_repository;
pub mod connectivity;
pub mod details_view_model;
