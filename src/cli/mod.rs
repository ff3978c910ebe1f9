//! CLI module for the Account Portal API

pub mod serve;

use clap::{Parser, Subcommand};

/// Account Portal API - Telegram-ID + PIN accounts with API-key auth
#[derive(Parser)]
#[command(name = "account-portal-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve,
}
