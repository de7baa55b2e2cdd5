use anyhow::Result;
use clap::{Args, Subcommand};

use super::print_json;
use crate::infrastructure::client::BookIqClient;

#[derive(Debug, Subcommand)]
pub enum TokenCommands {
    /// Create a new API token
    Create(CreateTokenCommand),
}

pub async fn run(client: &BookIqClient, cmd: TokenCommands) -> Result<()> {
    match cmd {
        TokenCommands::Create(c) => create_token(client, c).await,
    }
}

#[derive(Debug, Args)]
pub struct CreateTokenCommand {
    #[arg(long)]
    pub name: String,
}

pub async fn create_token(client: &BookIqClient, command: CreateTokenCommand) -> Result<()> {
    let token = client.create_token(&command.name).await?;
    print_json(&token)
}
