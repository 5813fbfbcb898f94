//! Core infrastructure: configuration, settings store, and error types.

pub mod config;
pub mod error;
pub mod settings;
