//! CLI Module
//!
//! Command-line host for the Triband processor.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Triband - three-band multiband compressor
#[derive(Parser, Debug)]
#[command(name = "triband")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stream a WAV file through the processor block by block
    #[command(name = "render")]
    Render {
        /// Input WAV file (mono or stereo)
        input: PathBuf,

        /// Output WAV file (32-bit float)
        output: PathBuf,

        /// Settings JSON file (defaults when omitted)
        #[arg(short, long)]
        settings: Option<PathBuf>,

        /// Parameter override, e.g. --set "Threshold Low Band=-20"
        #[arg(long = "set", value_name = "NAME=VALUE")]
        overrides: Vec<String>,

        /// Host block size in samples
        #[arg(short, long, default_value_t = 512)]
        block_size: usize,
    },

    /// Print or write the default settings
    #[command(name = "defaults")]
    Defaults {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List every host parameter with its range and default
    #[command(name = "params")]
    Params,

    /// Check a settings file for out-of-range values
    #[command(name = "validate")]
    Validate {
        /// Settings JSON file
        path: PathBuf,
    },
}
