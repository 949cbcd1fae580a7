// oss-uploader - upload files to object storage with server-signed form policies

mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use commands::{execute_params, execute_upload};
use oss_uploader::uploader::{uploader_instance, HttpTransport, UploaderSettings};

/// Get default config path (~/.oss-uploader/config.yaml)
fn default_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Failed to get home directory")?;
    Ok(home.join(".oss-uploader").join("config.yaml"))
}

/// Load configuration from file
fn load_settings(path: &PathBuf) -> Result<UploaderSettings> {
    if !path.exists() {
        return Err(anyhow::anyhow!(
            "Config file not found: {}. Please create it first.",
            path.display()
        ));
    }

    UploaderSettings::from_file(path)
        .with_context(|| format!("Failed to load config file: {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Determine config path
    let config_path = match cli.config {
        Some(ref path) => PathBuf::from(shellexpand::tilde(path).to_string()),
        None => default_config_path()?,
    };

    let mut settings = load_settings(&config_path)?;
    if let Some(ref provider_type) = cli.provider_type {
        settings.provider_type = provider_type.clone();
    }

    let mut config = settings
        .into_config()
        .context("Failed to build uploader config")?;
    config.fallback_transport = Some(Arc::new(
        HttpTransport::new().context("Failed to create http transport")?,
    ));
    let uploader = uploader_instance(config);

    match &cli.command {
        Commands::Upload(args) => execute_upload(args, &uploader).await?,
        Commands::Params(args) => execute_params(args, &uploader).await?,
    }

    Ok(())
}
