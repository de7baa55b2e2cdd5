pub mod profiles;
pub mod scans;
pub mod tokens;

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use profiles::ProfileCommands;
use scans::ScanCommands;
use tokens::TokenCommands;

#[derive(Debug, Parser)]
#[command(author, version, about = "Analyze book covers and track scan history", long_about = None)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "BOOKIQ_URL",
        default_value = "http://localhost:3000"
    )]
    pub api_url: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeCommand),

    /// Analyze a cover photo and store the result
    Scan(ScanCommand),

    /// Work with past scans
    History {
        #[command(subcommand)]
        command: ScanCommands,
    },

    /// Show recommendations from the most recent scan
    Recommendations,

    /// Manage the reader profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Manage API tokens
    Token {
        #[command(subcommand)]
        command: TokenCommands,
    },
}

#[derive(Debug, Args)]
pub struct ServeCommand {
    #[arg(long, env = "BOOKIQ_DATABASE_URL", default_value = "sqlite://bookiq.db")]
    pub database_url: String,

    #[arg(long, env = "BOOKIQ_BIND_ADDRESS", default_value = "127.0.0.1:3000")]
    pub bind_address: SocketAddr,

    #[arg(long, env = "BOOKIQ_GEMINI_API_KEY")]
    pub gemini_api_key: Option<String>,
}

#[derive(Debug, Args)]
pub struct ScanCommand {
    /// Path to a JPEG photo of the book cover
    pub image: PathBuf,
}

pub(crate) fn print_json<T>(value: &T) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
