//! RBAC directory administration command-line front end.

#![forbid(unsafe_code)]

mod cli_command;
mod cli_config;
mod demo_seed;
mod directory_commands;

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use rbac_admin_application::fault_message;
use rbac_admin_core::{AppError, AppResult};
use rbac_admin_infrastructure::HttpDirectoryClient;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli_command::CliCommand;
use crate::cli_config::{CliConfig, DirectoryMode};
use crate::directory_commands::Directories;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    match run().await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            warn!(error = %error, "command failed");
            eprintln!("{}", fault_message(&error));
            ExitCode::FAILURE
        }
    }
}

async fn run() -> AppResult<String> {
    let config = CliConfig::load()?;
    let command = CliCommand::parse(env::args().skip(1))?;
    let directories = build_directories(&config)?;

    directory_commands::execute(command, &directories, &config.pagination).await
}

fn build_directories(config: &CliConfig) -> AppResult<Directories> {
    match config.directory_mode {
        DirectoryMode::Memory => Ok(demo_seed::seeded_directories()),
        DirectoryMode::Http => {
            let http_client = reqwest::Client::builder()
                .timeout(config.http_timeout)
                .build()
                .map_err(|error| {
                    AppError::Internal(format!("failed to build HTTP client: {error}"))
                })?;
            let client = Arc::new(HttpDirectoryClient::new(
                http_client,
                config.api_base_url.clone(),
            )?);

            info!(
                api_base_url = %client.base_url(),
                timeout_secs = config.http_timeout.as_secs(),
                "using REST directory"
            );

            Ok(Directories {
                users: client.clone(),
                roles: client.clone(),
                permissions: client,
            })
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
