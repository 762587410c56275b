pub mod loader;
pub mod uploader;

use crate::api::{resolve_organization, FeatureApi};
use crate::config::ImportConfig;
use crate::error::ImportError;

pub use uploader::{ImportSummary, UploadError, UploadResult};

/// How an import run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// No single organization matched, nothing was uploaded
    OrganizationNotResolved,
    Completed(ImportSummary),
}

/// Validates the input, resolves the organization, then uploads every feature.
///
/// Per-feature failures are logged and counted in the summary. Only a bad
/// input path, an unreadable collection, or a failed organization lookup
/// end the run with an error.
pub async fn run_import<A: FeatureApi + ?Sized>(
    api: &A,
    config: &ImportConfig,
) -> Result<ImportOutcome, ImportError> {
    let input_path = loader::validate_input_path(config.input_path.as_deref())?;

    tracing::info!(
        "Resolving organization {:?} at {}",
        config.organization_name,
        config.api_base_url
    );

    let Some(organization) = resolve_organization(api, &config.organization_name).await? else {
        tracing::warn!(
            "Organization {:?} did not resolve to exactly one record, nothing imported",
            config.organization_name
        );
        return Ok(ImportOutcome::OrganizationNotResolved);
    };

    tracing::info!("Using organization {}", organization.id);

    let features = loader::features_from_path(&input_path)?;
    let summary = uploader::upload_features(api, &organization, features).await;

    tracing::info!(
        "Import complete: {} attempted, {} created, {} rejected, {} failed",
        summary.attempted,
        summary.created,
        summary.rejected,
        summary.failed
    );

    Ok(ImportOutcome::Completed(summary))
}
