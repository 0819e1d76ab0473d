//! Errors and runtime configuration shared by every stage.

pub mod config;
pub mod error;
