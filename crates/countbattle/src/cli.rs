//! Command-line interface for countbattle.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use countbattle_core::ScoringMode;

/// Count Battle - Go counting quiz tools
#[derive(Parser, Debug)]
#[command(name = "countbattle")]
#[command(about = "Score Go positions and replay counting-quiz sessions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Board files to read instead of the configured ones.
#[derive(Args, Debug, Clone, Default)]
pub struct CatalogArgs {
    /// Board file (records separated by blank lines)
    #[arg(long, requires = "dead")]
    pub boards: Option<PathBuf>,

    /// Dead-stone file matching the board file
    #[arg(long, requires = "boards")]
    pub dead: Option<PathBuf>,

    /// Use the hard catalog from the configuration
    #[arg(long, conflicts_with = "boards")]
    pub hard: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score one board, optionally disguised by a symmetry
    Score {
        #[command(flatten)]
        catalog: CatalogArgs,

        /// Record index in the catalog
        #[arg(short, long, default_value = "0")]
        index: usize,

        /// Mirror left to right
        #[arg(long)]
        flip_x: bool,

        /// Mirror top to bottom
        #[arg(long)]
        flip_y: bool,

        /// Swap rows and columns
        #[arg(long)]
        transpose: bool,

        /// Swap stone colors
        #[arg(long)]
        invert: bool,

        /// Pick a random symmetry instead of the flags
        #[arg(long, conflicts_with_all = ["flip_x", "flip_y", "transpose", "invert"])]
        random: bool,

        /// Count used for the verdict (territory or area)
        #[arg(short, long)]
        mode: Option<ScoringMode>,
    },

    /// List every board of a catalog with both counts
    Catalog {
        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// Drive a session through a JSON-lines script, printing the phase after each step
    Replay {
        /// Script file, one step per line
        script: PathBuf,

        /// Seed for symmetries and game ids
        #[arg(long)]
        seed: Option<u64>,
    },
}
