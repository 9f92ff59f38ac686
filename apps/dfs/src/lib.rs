//! # DFS Library
//!
//! This library exposes the `dfs` application modules for testing and
//! integration.
//!
//! The main binary uses these modules through the `main.rs` entry point.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod report;

// Re-export dfs_core for convenience
pub use dfs_core;
