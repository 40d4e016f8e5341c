// src/cli/mod.rs
// Command surface for roster maintenance

pub mod config;
pub mod create;
pub mod export;
pub mod show;
pub mod update;
pub mod validate;

use crate::roster::SortKey;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rate-roster")]
#[command(about = "Rate Roster - keeps a team's achievement-rate bucket grid in order", long_about = None)]
pub struct Cli {
    /// Settings file to use instead of the one in the platform config directory
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new roster with every member at 0.00%
    Create {
        /// Roster file to create (.json, or .db/.sqlite for SQLite)
        path: PathBuf,
        /// Team quota
        #[arg(long)]
        quota: f64,
        /// Member names (may be empty)
        #[arg(long, num_args = 0..)]
        names: Vec<String>,
        /// Order of names in the initial bucket (defaults to the configured sort)
        #[arg(long, value_enum)]
        sort: Option<SortKey>,
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },

    /// Record units completed by one member
    #[command(alias = "idea")]
    Update {
        /// Roster file
        path: PathBuf,
        /// Member name
        name: String,
        /// Units completed (may be negative for a correction)
        #[arg(allow_negative_numbers = true)]
        completed: f64,
    },

    /// Print buckets, rates and members
    Show {
        /// Roster file
        path: PathBuf,
    },

    /// Check a roster, or every roster under a directory, for structural problems
    Validate {
        /// Roster file or directory
        path: PathBuf,
    },

    /// Render a roster as an Excel worksheet
    Export {
        /// Roster file
        path: PathBuf,
        /// Output .xlsx file
        out: PathBuf,
    },

    /// Print the active settings
    Config {
        /// Write the active settings to the settings file
        #[arg(long)]
        init: bool,
    },
}
