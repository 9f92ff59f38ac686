//! `dfs` binary entry point.

use clap::Parser;
use dfs::cli::{self, Cli, Commands};
use dfs::config::{load_settings, ServerConfig};
use dfs::error::AppResult;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();
    init_tracing(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// RUST_LOG wins; otherwise `info`, or `debug` with `--verbose`.
/// Logs go to stderr so `--json` output stays clean.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

async fn run(args: Cli) -> AppResult<()> {
    let settings = load_settings(args.settings.as_deref())?;

    match args.command {
        Commands::Scan { input, json } => {
            cli::cmd_scan(&input, json)?;
        }
        Commands::Coverage { input, json } => {
            cli::cmd_coverage(&input, json)?;
        }
        Commands::Access {
            role,
            feature,
            action,
            json,
        } => {
            cli::cmd_access(role.as_deref(), &feature, &action, json)?;
        }
        Commands::Matrix { role, json } => {
            cli::cmd_matrix(role.as_deref(), json)?;
        }
        Commands::Fix {
            input,
            issue,
            all,
            json,
        } => {
            cli::cmd_fix(&input, issue.as_deref(), all, &settings, json)?;
        }
        Commands::Watch {
            input,
            interval_secs,
            iterations,
        } => {
            cli::cmd_watch(
                &input,
                Duration::from_secs(interval_secs),
                iterations,
                &settings,
            )
            .await?;
        }
        Commands::Server {
            host,
            port,
            api_key,
            rate_limit,
        } => {
            let config = ServerConfig {
                host,
                port,
                api_key,
                rate_limit_per_sec: rate_limit,
                settings,
            };
            dfs::api::serve(config).await?;
        }
    }
    Ok(())
}
