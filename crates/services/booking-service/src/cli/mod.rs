//! Command-line interface.
//!
//! - `serve` - Start the HTTP server
//! - `migrate` - Database migrations
//! - `seed` - Demo accounts and sample events

pub mod args;

pub use args::{Cli, Commands};
