//! claude-usage-bar - Claude usage limits for your status bar
//!
//! Polls the claude.ai organization usage endpoint and prints one widget
//! update per line, as plain text or as waybar JSON:
//! - `claude-usage-bar` / `watch` - poll forever (default command)
//! - `claude-usage-bar once` - single update for interval-driven bars
//! - `claude-usage-bar open` - open the usage page (bind to on-click)

mod cli;
mod core;
mod logging;
mod providers;
mod settings;

use clap::Parser;
use std::sync::Arc;

use cli::{exit_codes, Cli, Commands};
use crate::core::UsageSource;
use providers::ClaudeProvider;
use settings::SettingsError;

fn main() {
    let exit_code = run();
    std::process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();

    // Initialize logging
    if let Err(e) = logging::init(cli.verbose, cli.json_output, cli.log_level.as_deref()) {
        eprintln!("Failed to initialize logging: {}", e);
        return exit_codes::UNEXPECTED_FAILURE;
    }

    // Create tokio runtime for async commands
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create runtime: {}", e);
            return exit_codes::UNEXPECTED_FAILURE;
        }
    };

    let source: Arc<dyn UsageSource> = Arc::new(ClaudeProvider::new());
    let settings_path = cli.settings_path();
    let overrides = cli.overrides();
    let use_color = cli.use_color();

    match cli.command {
        Some(Commands::Once) => rt.block_on(async {
            match cli::once::run(source, settings_path.as_deref(), &overrides, use_color).await {
                Ok(code) => code,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    categorize_error(&e)
                }
            }
        }),
        Some(Commands::Open(args)) => match cli::open::run(args) {
            Ok(()) => exit_codes::SUCCESS,
            Err(e) => {
                eprintln!("Error: {}", e);
                exit_codes::UNEXPECTED_FAILURE
            }
        },
        Some(Commands::Config(args)) => rt.block_on(async {
            match cli::config::run(args, settings_path).await {
                Ok(()) => exit_codes::SUCCESS,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    categorize_error(&e)
                }
            }
        }),
        Some(Commands::Watch) | None => rt.block_on(async {
            match cli::watch::run(source, settings_path, overrides, use_color).await {
                Ok(()) => exit_codes::SUCCESS,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    categorize_error(&e)
                }
            }
        }),
    }
}

/// Categorize an error into the appropriate exit code
///
/// Fetch failures never get here; they are rendered as widget states.
fn categorize_error(e: &anyhow::Error) -> i32 {
    match e.downcast_ref::<SettingsError>() {
        Some(SettingsError::Invalid { .. }) => exit_codes::PARSE_ERROR,
        _ => exit_codes::UNEXPECTED_FAILURE,
    }
}
