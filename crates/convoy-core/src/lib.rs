//! convoy-core - Synchronization engine for Convoy
//!
//! Loads a workspace's operational records (vehicles, trailers, drivers,
//! charges, clients, tours, trips, quotes), applies local edits
//! optimistically, and reconciles the backend's change notifications so
//! every connected client converges on the same view.

pub mod activity;
pub mod backend;
pub mod connectivity;
pub mod engine;
pub mod error;
pub mod members;
pub mod models;
pub mod notify;
pub mod session;
pub mod store;
pub mod util;

pub use engine::SyncEngine;
pub use error::{Error, Result};
