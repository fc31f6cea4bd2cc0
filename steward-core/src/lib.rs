//! Core foundation for Steward: error taxonomy, layered configuration,
//! shared collections, and tracing initialization.

pub mod config;
pub mod errors;
pub mod trace;
pub mod types;
