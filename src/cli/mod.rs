//! CLI module - Command-line interface for the profiles API
//!
//! Parsed with clap; every subcommand except `serve` and `init` works
//! directly against the configured database.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Profiles API - user profiles, token login and a status feed
#[derive(Parser)]
#[command(name = "profiles-api")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of the default search paths
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    #[command(alias = "web")]
    Serve,

    /// Create an account with staff and superuser rights
    CreateSuperuser {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        /// Prompted for on stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Replace an account's password
    ChangePassword {
        #[arg(long)]
        email: String,
        /// Prompted for on stdin when omitted
        #[arg(long)]
        password: Option<String>,
        /// Leave the account with no usable password
        #[arg(long, conflicts_with = "password")]
        unusable: bool,
    },

    /// Allow an account to log in again
    Activate {
        #[arg(long)]
        email: String,
    },

    /// Block an account from logging in
    Deactivate {
        #[arg(long)]
        email: String,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

pub use commands::*;
