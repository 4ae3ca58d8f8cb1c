// ABOUTME: Library root for lxd-provision - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod lxd;
pub mod output;
pub mod provision;
pub mod ssh;
pub mod types;
