//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// segreview: resumable review of image/mask segmentation batches
#[derive(Parser)]
#[command(name = "segreview")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON configuration file (default: <DIR>/segreview.json if present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Review the pending cases of a session root interactively
    Review {
        /// Session root containing images, masks, and mapping tables
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },

    /// Rate the current case and move to the next one
    Rate {
        /// Session root
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Score from 1 (acceptable, no changes) to 5 (bad images)
        #[arg(value_name = "SCORE", value_parser = clap::value_parser!(u8).range(1..=5))]
        score: u8,

        /// Free-text comment stored with the verdict
        #[arg(short, long, default_value = "")]
        comment: String,

        /// Edited mask to store before rating
        #[arg(short, long, value_name = "FILE")]
        mask: Option<PathBuf>,
    },

    /// List the cases still waiting for a verdict
    Queue {
        /// Session root
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Show at most this many cases
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show review progress and verdict counts
    Status {
        /// Session root
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
