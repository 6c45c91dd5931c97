//! Triband CLI - Multiband Compressor Host
//!
//! Command-line host for rendering audio files through the Triband processor.

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;

use triband::cli::commands;
use triband::cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("Triband v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(cmd) => handle_command(cmd),
        None => {
            println!("Triband v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands) -> anyhow::Result<()> {
    match cmd {
        Commands::Render {
            input,
            output,
            settings,
            overrides,
            block_size,
        } => {
            let controls = commands::load_settings(settings.as_deref(), &overrides)
                .context("failed to load settings")?;
            let report = commands::render(&input, &output, &controls, block_size)
                .with_context(|| format!("failed to render {}", input.display()))?;
            commands::print_render_report(&report);
            Ok(())
        }
        Commands::Defaults { output } => Ok(commands::defaults(output.as_deref())?),
        Commands::Params => Ok(commands::list_params()?),
        Commands::Validate { path } => Ok(commands::validate_settings(&path)?),
    }
}
