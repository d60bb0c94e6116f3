//! CLI command definitions for todo-tree
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

use crate::format::OutputFormat;
use clap::{Parser, Subcommand};

/// Hierarchical to-do list server and CLI tools
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Path to database file (overrides config)
    #[arg(short, long, global = true)]
    pub database: Option<String>,

    /// HTTP port (overrides config)
    #[arg(short, long, global = true)]
    pub port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP API server (default if no subcommand given)
    Serve,

    /// Print every list of a user with its task hierarchy
    Tree {
        /// Id of the user whose lists to print
        #[arg(short, long)]
        user: i64,

        /// Output format: markdown (default) or json
        #[arg(short, long, default_value = "markdown")]
        format: OutputFormat,
    },

    /// Delete all users, lists, tasks and sessions
    Reset {
        /// Skip the confirmation guard
        #[arg(long)]
        yes: bool,
    },
}
