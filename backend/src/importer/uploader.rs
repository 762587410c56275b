use serde_json::Value;
use uuid::Uuid;

use crate::api::{ApiError, FeatureApi};
use crate::domain::{EnvelopeError, FeatureEnvelope, Organization};

/// Per-feature failure. Logged and skipped, never propagated past the batch.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Could not build feature envelope: {0}")]
    Envelope(#[from] EnvelopeError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadResult {
    Created(Uuid),
    Rejected { status: u16, body: String },
}

/// Counts for one run over the input features
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub attempted: usize,
    pub created: usize,
    pub rejected: usize,
    pub failed: usize,
}

/// Builds the envelope for one feature and posts it
pub async fn upload_feature<A: FeatureApi + ?Sized>(
    api: &A,
    organization: &Organization,
    feature: &Value,
) -> Result<UploadResult, UploadError> {
    let envelope = FeatureEnvelope::build(feature, organization)?;
    let response = api.create_feature(&envelope).await?;

    if response.is_created() {
        Ok(UploadResult::Created(envelope.id))
    } else {
        Ok(UploadResult::Rejected {
            status: response.status,
            body: response.body,
        })
    }
}

/// Uploads every feature in order. One failing feature never stops the rest.
pub async fn upload_features<A, I>(
    api: &A,
    organization: &Organization,
    features: I,
) -> ImportSummary
where
    A: FeatureApi + ?Sized,
    I: IntoIterator<Item = Value>,
{
    let mut summary = ImportSummary::default();

    for feature in features {
        summary.attempted += 1;

        match upload_feature(api, organization, &feature).await {
            Ok(UploadResult::Created(id)) => {
                summary.created += 1;
                tracing::info!("Successfully uploaded feature(id={})", id);
            }
            Ok(UploadResult::Rejected { status, body }) => {
                summary.rejected += 1;
                tracing::info!("Unsuccessful: {} {}", status, body);
            }
            Err(e) => {
                summary.failed += 1;
                tracing::error!("Feature #{} not uploaded: {}", summary.attempted, e);
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CreateResponse;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records posted envelopes and answers from a fixed list of statuses
    struct RecordingApi {
        statuses: Vec<Option<u16>>,
        posted: Mutex<Vec<FeatureEnvelope>>,
    }

    impl RecordingApi {
        fn answering(statuses: Vec<Option<u16>>) -> Self {
            Self {
                statuses,
                posted: Mutex::new(Vec::new()),
            }
        }

        fn posted_names(&self) -> Vec<String> {
            self.posted
                .lock()
                .unwrap()
                .iter()
                .map(|e| e.name.clone())
                .collect()
        }
    }

    #[async_trait]
    impl FeatureApi for RecordingApi {
        async fn find_organizations(&self, _name: &str) -> Result<Option<Vec<Value>>, ApiError> {
            Ok(Some(vec![json!({ "_id": "org-1" })]))
        }

        async fn create_feature(
            &self,
            envelope: &FeatureEnvelope,
        ) -> Result<CreateResponse, ApiError> {
            let mut posted = self.posted.lock().unwrap();
            let index = posted.len();
            posted.push(envelope.clone());

            match self.statuses.get(index).copied().flatten() {
                Some(status) => Ok(CreateResponse {
                    status,
                    body: format!("{{\"_status\": {}}}", status),
                }),
                None => Err(ApiError::RequestFailed("connection refused".to_string())),
            }
        }
    }

    fn parcel(tmk: &str) -> Value {
        json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [-155.5, 19.6] },
            "properties": { "TMK": tmk }
        })
    }

    #[tokio::test]
    async fn test_upload_feature_created() {
        let api = RecordingApi::answering(vec![Some(201)]);
        let org = Organization::new("org-1");

        let result = upload_feature(&api, &org, &parcel("1-2-3")).await.unwrap();

        let posted = api.posted.lock().unwrap();
        assert_eq!(result, UploadResult::Created(posted[0].id));
        assert_eq!(posted[0].organization, "org-1");
        assert_eq!(posted[0].name, "TMK 1-2-3");
    }

    #[tokio::test]
    async fn test_upload_feature_rejected() {
        let api = RecordingApi::answering(vec![Some(422)]);
        let org = Organization::new("org-1");

        let result = upload_feature(&api, &org, &parcel("1-2-3")).await.unwrap();

        assert_eq!(
            result,
            UploadResult::Rejected {
                status: 422,
                body: "{\"_status\": 422}".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_upload_features_in_order() {
        let api = RecordingApi::answering(vec![Some(201), Some(201), Some(201)]);
        let org = Organization::new("org-1");
        let features = vec![parcel("1"), parcel("2"), parcel("3")];

        let summary = upload_features(&api, &org, features).await;

        assert_eq!(api.posted_names(), vec!["TMK 1", "TMK 2", "TMK 3"]);
        assert_eq!(
            summary,
            ImportSummary {
                attempted: 3,
                created: 3,
                rejected: 0,
                failed: 0
            }
        );
    }

    #[tokio::test]
    async fn test_missing_tmk_does_not_stop_batch() {
        let api = RecordingApi::answering(vec![Some(201), Some(201)]);
        let org = Organization::new("org-1");
        let features = vec![
            parcel("1"),
            json!({ "properties": { "NAME": "no tmk" } }),
            parcel("3"),
        ];

        let summary = upload_features(&api, &org, features).await;

        assert_eq!(api.posted_names(), vec!["TMK 1", "TMK 3"]);
        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.created, 2);
        assert_eq!(summary.failed, 1);
    }

    #[tokio::test]
    async fn test_transport_and_status_failures_are_contained() {
        // 2nd request fails in transport, 3rd is rejected
        let api = RecordingApi::answering(vec![Some(201), None, Some(400), Some(201)]);
        let org = Organization::new("org-1");
        let features = vec![parcel("1"), parcel("2"), parcel("3"), parcel("4")];

        let summary = upload_features(&api, &org, features).await;

        assert_eq!(api.posted_names().len(), 4);
        assert_eq!(
            summary,
            ImportSummary {
                attempted: 4,
                created: 2,
                rejected: 1,
                failed: 1
            }
        );
    }
}
