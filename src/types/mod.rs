// Shared type definitions for the details screen core.
// Each submodule defines types used across the crate.

pub mod author;
pub mod errors;
pub mod repo;
pub mod settings;
pub mod view_state;
