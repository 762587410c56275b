use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ImportError;

/// Resolves `input_path` to an existing regular file
pub fn validate_input_path(input_path: Option<&Path>) -> Result<PathBuf, ImportError> {
    let Some(input_path) = input_path else {
        return Err(ImportError::InvalidInputPath(None));
    };

    let invalid = || ImportError::InvalidInputPath(Some(input_path.to_path_buf()));

    let resolved = fs::canonicalize(input_path).map_err(|_| invalid())?;
    let metadata = fs::metadata(&resolved).map_err(|_| invalid())?;

    if !metadata.is_file() {
        return Err(invalid());
    }

    Ok(resolved)
}

/// Reads a feature collection and yields its features in file order.
///
/// The whole file is read into memory. A document without a `features`
/// key yields nothing.
pub fn features_from_path(
    input_path: &Path,
) -> Result<impl Iterator<Item = Value>, ImportError> {
    tracing::info!("Opening feature collection: {}", input_path.display());

    let content = fs::read_to_string(input_path).map_err(|source| ImportError::Io {
        path: input_path.to_path_buf(),
        source,
    })?;

    let mut collection: Value =
        serde_json::from_str(&content).map_err(|source| ImportError::Json {
            path: input_path.to_path_buf(),
            source,
        })?;

    let features = match collection.get_mut("features").map(Value::take) {
        None => {
            tracing::warn!("No features key in {}", input_path.display());
            Vec::new()
        }
        Some(Value::Array(features)) => features,
        Some(_) => return Err(ImportError::MalformedCollection(input_path.to_path_buf())),
    };

    tracing::info!("Found {} features", features.len());

    Ok(features.into_iter())
}
