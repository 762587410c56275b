use std::path::PathBuf;

use crate::api::ApiError;

/// Exit status for a missing or unusable input path
pub const EXIT_INVALID_INPUT_PATH: u8 = 100;

/// Exit status for every other fatal error
pub const EXIT_FAILURE: u8 = 1;

/// Errors that stop the whole import
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Please input a valid, importable feature collection file ({})", display_path(.0))]
    InvalidInputPath(Option<PathBuf>),

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path:?} as JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("`features` in {0:?} is not an array")]
    MalformedCollection(PathBuf),

    #[error("Organization lookup failed: {0}")]
    OrganizationLookup(#[from] ApiError),
}

impl ImportError {
    pub fn exit_code(&self) -> u8 {
        match self {
            ImportError::InvalidInputPath(_) => EXIT_INVALID_INPUT_PATH,
            _ => EXIT_FAILURE,
        }
    }
}

fn display_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => p.display().to_string(),
        None => "no path given".to_string(),
    }
}
