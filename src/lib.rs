// ABOUTME: Library root for harmonia - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod error;
pub mod kubectl;
pub mod ops;
pub mod output;
pub mod poll;
pub mod portal;
pub mod status;
pub mod task;
pub mod teardown;
pub mod types;
