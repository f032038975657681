//! Common utilities shared across the workspace.
//!
//! This crate provides:
//! - Unified error handling with HTTP mapping
//! - Configuration structures

pub mod config;
pub mod error;

pub use config::*;
#[cfg(feature = "database")]
pub use error::map_unique_violation;
pub use error::{AppError, AppResult, OptionExt};
