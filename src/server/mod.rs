//! Query service module.
//!
//! Provides a read-only JSON API over a loaded SQLite store.

pub mod context;
pub mod routes;

pub use context::AppState;
pub use routes::{build_router, serve};
