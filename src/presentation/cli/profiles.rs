use anyhow::Result;
use clap::{Args, Subcommand};

use super::print_json;
use crate::domain::profiles::UpdateProfile;
use crate::infrastructure::client::BookIqClient;

#[derive(Debug, Subcommand)]
pub enum ProfileCommands {
    /// Show the reader profile
    Show,
    /// Update profile fields
    Update(UpdateProfileCommand),
}

pub async fn run(client: &BookIqClient, cmd: ProfileCommands) -> Result<()> {
    match cmd {
        ProfileCommands::Show => show_profile(client).await,
        ProfileCommands::Update(c) => update_profile(client, c).await,
    }
}

pub async fn show_profile(client: &BookIqClient) -> Result<()> {
    let profile = client.profile().await?;
    print_json(&profile)
}

#[derive(Debug, Args)]
pub struct UpdateProfileCommand {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub favorite_genre: Option<String>,
    /// School grade, e.g. "4" or "All ages"
    #[arg(long)]
    pub school_grade: Option<String>,
}

pub async fn update_profile(client: &BookIqClient, command: UpdateProfileCommand) -> Result<()> {
    let payload = UpdateProfile {
        first_name: command.first_name,
        last_name: command.last_name,
        favorite_genre: command.favorite_genre,
        school_grade: command.school_grade,
    };

    let profile = client.update_profile(&payload).await?;
    print_json(&profile)
}
