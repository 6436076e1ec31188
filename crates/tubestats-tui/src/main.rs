mod action;
mod app;
mod app_state;
mod component;
mod components;
mod focus;
mod format;
mod theme;
mod widgets;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tubestats_proto::api::HttpApi;
use tubestats_proto::config::{Config, API_URL_ENV};

/// Terminal client for the YouTube channel stats API.
#[derive(Parser, Debug)]
#[command(name = "tubestats", version, about)]
struct Args {
    /// Stats API base URL (overrides config and environment)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let data_dir = tubestats_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = tubestats_proto::platform::log_path();

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; default to debug for app code but keep
    // connection-level chatter from the HTTP client quiet.
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    eprintln!("tubestats log: {}", log_path.display());
    tracing::info!("tubestats starting…");

    // ── Config: file < environment < command line ────────────────────────────
    let mut config = match &args.config {
        Some(path) => {
            let mut config = Config::load_from(path)?;
            config.apply_env(std::env::var(API_URL_ENV).ok());
            config
        }
        None => Config::load().unwrap_or_else(|e| {
            tracing::warn!("config load failed, using defaults: {}", e);
            let mut config = Config::default();
            config.apply_env(std::env::var(API_URL_ENV).ok());
            config
        }),
    };
    if let Some(url) = args.api_url {
        config.api.base_url = url;
    }

    let api = HttpApi::new(&config.api)?;
    tracing::info!("stats API at {}", api.base_url());
    let base_url = api.base_url().to_string();

    let app = app::App::new(Arc::new(api), base_url, config.ui);
    app.run().await?;

    Ok(())
}
