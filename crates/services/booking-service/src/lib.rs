//! Booking Service Library
//!
//! Event catalog, seat bookings and PDF tickets over a REST API.
//! Layers, outermost first: `api` (axum), `service` (business rules),
//! `repository` (sea-orm), `infra` (connections, migrations, transactions).

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod infra;
pub mod repository;
pub mod service;
