//! HTTP API handlers for af-search

pub mod album;
pub mod health;

pub use album::{album_routes, search_album};
pub use health::health_routes;
