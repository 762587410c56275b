pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod importer;

pub use config::ImportConfig;
pub use error::ImportError;
pub use importer::{run_import, ImportOutcome, ImportSummary};
