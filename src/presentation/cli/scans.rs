use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use clap::{Args, Subcommand};

use super::ScanCommand;
use super::print_json;
use crate::domain::ids::ScanId;
use crate::infrastructure::client::BookIqClient;

#[derive(Debug, Subcommand)]
pub enum ScanCommands {
    /// List past scans, newest first
    List(ListScansCommand),
    /// Get a scan by ID
    Get(GetScanCommand),
}

pub async fn run(client: &BookIqClient, cmd: ScanCommands) -> Result<()> {
    match cmd {
        ScanCommands::List(c) => list_scans(client, c).await,
        ScanCommands::Get(c) => get_scan(client, c).await,
    }
}

pub async fn scan(client: &BookIqClient, command: ScanCommand) -> Result<()> {
    let bytes = std::fs::read(&command.image)
        .with_context(|| format!("failed to read image {}", command.image.display()))?;
    let image_base64 = BASE64_STANDARD.encode(bytes);

    let record = client.scan(&image_base64).await?;
    print_json(&record)
}

#[derive(Debug, Args)]
pub struct ListScansCommand {
    /// Return at most this many scans
    #[arg(long)]
    pub limit: Option<i64>,
}

pub async fn list_scans(client: &BookIqClient, command: ListScansCommand) -> Result<()> {
    let scans = client.history(command.limit).await?;
    print_json(&scans)
}

#[derive(Debug, Args)]
pub struct GetScanCommand {
    pub id: i64,
}

pub async fn get_scan(client: &BookIqClient, command: GetScanCommand) -> Result<()> {
    let scan = client.get_scan(ScanId::new(command.id)).await?;
    print_json(&scan)
}

pub async fn recommendations(client: &BookIqClient) -> Result<()> {
    let recommendations = client.recommendations().await?;
    print_json(&recommendations)
}
