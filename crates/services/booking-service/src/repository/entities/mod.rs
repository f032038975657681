//! SeaORM entity definitions.

pub mod booking;
pub mod event;
pub mod user;
