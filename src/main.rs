use anyhow::Result;
use bookiq::application::{ServerConfig, serve};
use bookiq::infrastructure::client::BookIqClient;
use bookiq::presentation::cli::{Cli, Commands, ServeCommand, profiles, scans, tokens};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before clap parses env vars)
    let _ = dotenvy::dotenv();

    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(cmd) => run_server(cmd).await,
        Commands::Scan(cmd) => {
            let client = BookIqClient::from_base_url(&cli.api_url)?;
            scans::scan(&client, cmd).await
        }
        Commands::History { command } => {
            let client = BookIqClient::from_base_url(&cli.api_url)?;
            scans::run(&client, command).await
        }
        Commands::Recommendations => {
            let client = BookIqClient::from_base_url(&cli.api_url)?;
            scans::recommendations(&client).await
        }
        Commands::Profile { command } => {
            let client = BookIqClient::from_base_url(&cli.api_url)?;
            profiles::run(&client, command).await
        }
        Commands::Token { command } => {
            let client = BookIqClient::from_base_url(&cli.api_url)?;
            tokens::run(&client, command).await
        }
    }
}

async fn run_server(command: ServeCommand) -> Result<()> {
    let gemini_api_key = command.gemini_api_key.unwrap_or_default();
    if gemini_api_key.is_empty() {
        tracing::warn!("BOOKIQ_GEMINI_API_KEY is not set - cover analysis requests will fail");
    }

    let config = ServerConfig {
        bind_address: command.bind_address,
        database_url: command.database_url,
        gemini_api_key,
    };

    serve(config).await
}

#[allow(clippy::expect_used)] // Startup: panicking is appropriate if logging cannot be initialized
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("RUST_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().compact())
            .init();
    }
}
