use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tmk_importer_backend::api::ApiClient;
use tmk_importer_backend::config::{
    ImportConfig, DEFAULT_API_BASE_URL, DEFAULT_LOG_LEVEL, DEFAULT_ORGANIZATION_NAME,
};
use tmk_importer_backend::error::EXIT_FAILURE;
use tmk_importer_backend::{run_import, ImportError, ImportOutcome};

#[derive(Parser, Debug)]
#[command(name = "import")]
#[command(about = "Import TMK parcels from a GeoJSON feature collection", long_about = None)]
struct Args {
    /// Path to tmk feature collection file being imported
    #[arg(long, alias = "tmk_feature_collection_path")]
    tmk_feature_collection_path: Option<PathBuf>,

    /// Base URL of the resource API
    #[arg(long, env = "TMK_API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    api_base_url: String,

    /// Name of the organization that will own the imported features
    #[arg(long, env = "TMK_ORGANIZATION_NAME", default_value = DEFAULT_ORGANIZATION_NAME)]
    organization: String,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "TMK_LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,
}

impl Args {
    fn into_config(self) -> ImportConfig {
        let config = ImportConfig::new(&self.api_base_url, &self.organization)
            .with_log_level(&self.log_level);

        match self.tmk_feature_collection_path {
            Some(path) => config.with_input_path(path),
            None => config,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = Args::parse().into_config();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    match run(&config).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            let code = e
                .downcast_ref::<ImportError>()
                .map(ImportError::exit_code)
                .unwrap_or(EXIT_FAILURE);
            ExitCode::from(code)
        }
    }
}

async fn run(config: &ImportConfig) -> Result<ImportOutcome> {
    tracing::info!("Starting TMK import");

    let api = ApiClient::new(&config.api_base_url).context("Failed to create API client")?;
    let outcome = run_import(&api, config).await?;

    tracing::info!("Import process completed");

    Ok(outcome)
}
