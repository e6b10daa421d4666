//! author-details: the core of an author "details" screen.
//!
//! A view-model merges a remote API and a local SQLite cache into one stream
//! of immutable view-state snapshots, reconciling online and offline loads.
//! This library crate exposes all modules for use by the RPC host binary and
//! integration tests.

pub mod app;
pub mod database;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod testing;
pub mod types;
