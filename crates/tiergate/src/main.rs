// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tiergate - sensitivity- and cost-aware backend routing for analytical queries.
//!
//! This is the binary entry point: routing explanation, simulation with
//! reporting and export, and configuration display.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod report;
mod route;
mod simulate;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tiergate_config::TiergateConfig;
use tiergate_core::TiergateError;

/// Tiergate - route analytical queries to the right execution tier.
#[derive(Parser, Debug)]
#[command(name = "tiergate", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Explain where a query would be routed.
    Route(route::RouteArgs),
    /// Drive the router with simulated backends and report on the outcome.
    Simulate(simulate::SimulateArgs),
    /// Print the effective configuration as TOML.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup
    let loaded = match &cli.config {
        Some(path) => tiergate_config::load_and_validate_path(path),
        None => tiergate_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            tiergate_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.service.log_level);
    tiergate_telemetry::recording::register_metrics();

    let result = match cli.command {
        Some(Commands::Route(args)) => route::run_route(&config, &args),
        Some(Commands::Simulate(args)) => simulate::run_simulate(&config, &args).await,
        Some(Commands::Config) => print_config(&config),
        None => {
            println!("tiergate: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn print_config(config: &TiergateConfig) -> Result<(), TiergateError> {
    let rendered = toml::to_string_pretty(config)
        .map_err(|e| TiergateError::Internal(format!("failed to render config: {e}")))?;
    print!("{rendered}");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
///
/// Logs go to stderr so `--json` and export output stay machine-readable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tiergate={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc supports advancing the stats epoch.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_route_command() {
        let cli = Cli::try_parse_from([
            "tiergate",
            "route",
            "--question",
            "Top customers",
            "--source",
            "snowflake",
            "--sensitivity",
            "internal",
            "--complexity",
            "simple",
            "--iterate",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Route(args)) => {
                assert!(args.iterate);
                assert_eq!(args.sensitivity, "internal");
                assert_eq!(args.tokens, 0);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn default_config_renders_as_toml() {
        let rendered = toml::to_string_pretty(&TiergateConfig::default()).unwrap();
        assert!(rendered.contains("in_perimeter_source = \"snowflake\""));
        assert!(rendered.contains("api_premium"));
        assert!(rendered.contains("max_history = 10000"));
    }
}
