pub mod api;
pub mod bridge;
pub mod cli;
mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod render;
pub mod scope_path;
pub mod services;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

pub use api::Api;
pub use bridge::{Invoke, LocalHost};
pub use error::{AppError, ListingError};
pub use models::{DirectoryEntry, EntryOrder, PickerConfig};
pub use services::browser::{DirectoryBrowser, GestureOutcome, ListingView};
pub use services::listing_service::{FsListingProvider, ListingOptions, ListingProvider};

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    // stdout carries the selection result, so logs go to stderr.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run() -> anyhow::Result<ExitCode> {
    let args = cli::Args::parse();
    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => config::default_config_path()?,
    };
    let config = args.apply_to(config::load_config(&config_path)?);
    init_tracing(&config.log_filter);

    if args.write_config {
        config::save_config(&config_path, &config)?;
        tracing::info!(path = %config_path.display(), "saved config");
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    match runtime.block_on(cli::pick(&config))? {
        cli::Decision::Selected(entry) => {
            println!("{}", serde_json::to_string(&entry)?);
            Ok(ExitCode::SUCCESS)
        }
        cli::Decision::Closed => Ok(ExitCode::from(1)),
    }
}
