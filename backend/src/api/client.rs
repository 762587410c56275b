//! Client for the Eve-style resource API the importer talks to.
//!
//! Two collections are used: `organizations` (looked up by name) and
//! `features` (one `POST` per imported parcel).

use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::domain::{FeatureEnvelope, Organization};

const ORGANIZATIONS: &str = "organizations";
const FEATURES: &str = "features";

/// Errors talking to the API (transport or undecodable body).
/// Non-success statuses are not errors, callers decide what they mean.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response from API: {0}")]
    InvalidResponse(String),
}

/// Response to a create request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateResponse {
    pub status: u16,
    pub body: String,
}

impl CreateResponse {
    pub fn is_created(&self) -> bool {
        self.status == StatusCode::CREATED.as_u16()
    }
}

/// The two API calls the importer makes
#[async_trait]
pub trait FeatureApi: Send + Sync {
    /// Raw organization records whose name contains `name`.
    /// `None` when the API did not answer `200`.
    async fn find_organizations(&self, name: &str) -> Result<Option<Vec<Value>>, ApiError>;

    async fn create_feature(&self, envelope: &FeatureEnvelope) -> Result<CreateResponse, ApiError>;
}

/// Returns the organization only if exactly one matches `name`
pub async fn resolve_organization<A: FeatureApi + ?Sized>(
    api: &A,
    name: &str,
) -> Result<Option<Organization>, ApiError> {
    let Some(mut items) = api.find_organizations(name).await? else {
        return Ok(None);
    };

    if items.len() != 1 {
        tracing::debug!("{} organizations matched {:?}", items.len(), name);
        return Ok(None);
    }

    let organization = items.pop().and_then(Organization::from_record);
    if organization.is_none() {
        tracing::warn!("Organization matching {:?} has no _id", name);
    }
    Ok(organization)
}

/// Substring filter on `field`, sent as the `where` parameter.
///
/// `value` is escaped so it only ever matches literally.
pub fn substring_filter(field: &str, value: &str) -> Value {
    let mut filter = Map::new();
    filter.insert(
        field.to_string(),
        json!({ "$regex": format!(".*{}.*", escape_pattern(value)) }),
    );
    Value::Object(filter)
}

fn escape_pattern(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(
            c,
            '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[derive(Debug, Deserialize)]
struct ItemsResponse {
    #[serde(rename = "_items", default)]
    items: Vec<Value>,
}

/// reqwest-backed [`FeatureApi`]
pub struct ApiClient {
    http_client: HttpClient,
    base_url: String,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http_client = HttpClient::builder()
            .build()
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn resource_url(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource)
    }
}

#[async_trait]
impl FeatureApi for ApiClient {
    async fn find_organizations(&self, name: &str) -> Result<Option<Vec<Value>>, ApiError> {
        let filter = substring_filter("name", name).to_string();

        let response = self
            .http_client
            .get(self.resource_url(ORGANIZATIONS))
            .query(&[("where", filter.as_str())])
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {
                let body = response
                    .json::<ItemsResponse>()
                    .await
                    .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
                Ok(Some(body.items))
            }
            status => {
                tracing::debug!("Organization lookup returned {}", status);
                Ok(None)
            }
        }
    }

    async fn create_feature(&self, envelope: &FeatureEnvelope) -> Result<CreateResponse, ApiError> {
        let response = self
            .http_client
            .post(self.resource_url(FEATURES))
            .json(envelope)
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;

        Ok(CreateResponse { status, body })
    }
}
