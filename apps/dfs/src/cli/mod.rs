//! # CLI
//!
//! clap definitions and the command implementations behind them.
//!
//! Every `cmd_*` function prints its result (text or JSON) and also returns
//! it, so integration tests can assert on the data without parsing stdout.

mod commands;

pub use commands::{
    cmd_access, cmd_coverage, cmd_fix, cmd_matrix, cmd_scan, cmd_watch, load_profiles,
};

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// DFS Manager access audit.
#[derive(Debug, Parser)]
#[command(name = "dfs", version, about = "Role resolver and user validation for DFS Manager")]
pub struct Cli {
    /// Log at debug level.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON settings file (notification preferences, auto-fix policy).
    #[arg(long, global = true, env = "DFS_SETTINGS")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a profile snapshot for validation issues.
    Scan {
        /// JSON file holding an array of user profiles.
        #[arg(short, long)]
        input: PathBuf,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Check that enough active administrators remain.
    Coverage {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(long)]
        json: bool,
    },

    /// Ask whether a role may perform an action on a feature.
    Access {
        /// Role (omit to check the no-role case).
        #[arg(short, long)]
        role: Option<String>,
        #[arg(short, long)]
        feature: String,
        #[arg(short, long)]
        action: String,
        #[arg(long)]
        json: bool,
    },

    /// Print the permission grants.
    Matrix {
        /// Only this role.
        #[arg(short, long)]
        role: Option<String>,
        #[arg(long)]
        json: bool,
    },

    /// Emit auto-fix patches for a scan.
    Fix {
        #[arg(short, long)]
        input: PathBuf,
        /// Issue id to fix.
        #[arg(long, conflicts_with = "all")]
        issue: Option<String>,
        /// Fix every auto-fixable issue.
        #[arg(long)]
        all: bool,
        #[arg(long)]
        json: bool,
    },

    /// Rescan a snapshot file periodically and log changes.
    Watch {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(long, default_value_t = 30)]
        interval_secs: u64,
        /// Stop after this many scans.
        #[arg(long)]
        iterations: Option<u64>,
    },

    /// Run the HTTP API.
    Server {
        #[arg(long, env = "DFS_HOST", default_value = crate::config::DEFAULT_HOST)]
        host: String,
        #[arg(short, long, env = "DFS_PORT", default_value_t = crate::config::DEFAULT_PORT)]
        port: u16,
        /// Bearer token required by every route except /health.
        #[arg(long, env = "DFS_API_KEY")]
        api_key: Option<String>,
        /// Requests per second across the service.
        #[arg(long, env = "DFS_RATE_LIMIT", default_value_t = crate::config::DEFAULT_RATE_LIMIT)]
        rate_limit: u32,
    },
}
