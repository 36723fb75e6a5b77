//! CLI argument definitions using clap
//!
//! Commands:
//! - queryshape shape [--config <path>]
//! - queryshape compare [--config <path>]
//! - queryshape group [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// queryshape - value-independent shapes for document-database queries
#[derive(Parser, Debug)]
#[command(name = "queryshape")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the shape and fingerprint of each query read from stdin (one JSON query per line)
    Shape {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Read two queries from stdin and report whether they share a shape
    Compare {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Group the queries read from stdin by shape
    Group {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Command {
    /// Configuration path shared by all commands
    pub fn config_path(&self) -> Option<&PathBuf> {
        match self {
            Command::Shape { config } | Command::Compare { config } | Command::Group { config } => {
                config.as_ref()
            }
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
