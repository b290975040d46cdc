//! # Album Finder Common Library
//!
//! Shared code for the Album Finder services:
//! - Error types
//! - Configuration loading (CLI → ENV → TOML → compiled defaults)
//! - Logging initialization

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
