mod auth;
mod backend;
mod config;
mod document;
mod error;
mod github;
mod gitlab;
mod request;
mod server;

use anyhow::{Context, Result};
use clap::{Arg, Command};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::{BackendKind, Config};
use crate::server::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let matches = Command::new("palette-push")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Commits a new theme color into a repository-hosted JSON config")
        .arg(
            Arg::new("bind")
                .long("bind")
                .value_name("ADDR")
                .env("BIND_ADDR")
                .help("Address to listen on")
                .default_value("0.0.0.0:3000"),
        )
        .arg(
            Arg::new("backend")
                .long("backend")
                .value_name("BACKEND")
                .env("SCM_BACKEND")
                .help("Where the config file is hosted")
                .default_value("gitlab")
                .value_parser(clap::builder::ValueParser::new(str::parse::<BackendKind>)),
        )
        .get_matches();

    let filter = match std::env::var_os("RUST_LOG") {
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::new("palette_push=info,tower_http=info"),
    };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let bind = matches.get_one::<String>("bind").context("--bind has a default")?;
    let backend = *matches
        .get_one::<BackendKind>("backend")
        .context("--backend has a default")?;

    let config = Config::from_env(backend);
    info!(
        backend = %config.backend,
        file = %config.repo.file_path,
        branch = %config.repo.branch,
        field = %config.target,
        "Configuration loaded"
    );
    let missing = config.missing_settings();
    if !missing.is_empty() {
        warn!(
            missing = %missing.join(", "),
            "Required settings are not set; color updates will fail with 500 until they are"
        );
    }

    let state = Arc::new(AppState::new(config).context("Failed to create HTTP client")?);
    server::run_server(state, bind).await
}
