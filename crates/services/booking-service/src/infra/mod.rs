//! Infrastructure layer - database, migrations and transactions.

mod db;
pub mod migrations;
mod transaction;

pub use db::{Database, HealthCheck};
pub use migrations::Migrator;
pub use transaction::in_transaction;
