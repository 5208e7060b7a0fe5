//! # Vetted BFF Library
//!
//! This library provides the core functionality for the Vetted BFF service:
//! caller identity, the tenant gate, the pet service shared by the REST and
//! RPC surfaces, persistence, and server configuration.

pub mod config;
pub mod db;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod identity;
pub mod models;
pub mod repositories;
pub mod server;
pub mod services;
pub mod telemetry;
pub use migration;
