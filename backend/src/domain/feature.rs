use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Display name prefix for imported parcels
pub const NAME_PREFIX: &str = "TMK ";

/// Property holding the parcel identifier
pub const TMK_PROPERTY: &str = "TMK";

/// Format of `last_imported_at` (RFC 1123 style, always GMT)
pub const IMPORTED_AT_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("feature has no properties object")]
    MissingProperties,

    #[error("feature has no TMK property")]
    MissingTmk,
}

/// Organization record returned by the API. Only `_id` is read, the record
/// itself is kept as it came.
#[derive(Debug, Clone, PartialEq)]
pub struct Organization {
    pub id: Value,
    pub record: Value,
}

impl Organization {
    pub fn new(id: impl Into<Value>) -> Self {
        let id = id.into();
        Self {
            record: serde_json::json!({ "_id": id.clone() }),
            id,
        }
    }

    /// `None` when the record carries no usable `_id`
    pub fn from_record(record: Value) -> Option<Self> {
        let id = record.get("_id").filter(|id| !id.is_null())?.clone();
        Some(Self { id, record })
    }

    pub fn name(&self) -> Option<&str> {
        self.record.get("name").and_then(Value::as_str)
    }
}

/// Record sent to `POST /features`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureEnvelope {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub geojson: Value,
    pub restrictions: Map<String, Value>,
    pub organization: Value,
    pub name: String,
    pub last_imported_at: String,
}

impl FeatureEnvelope {
    /// Wraps a raw feature with a fresh identifier and the import time
    pub fn build(feature: &Value, organization: &Organization) -> Result<Self, EnvelopeError> {
        Self::build_at(feature, organization, Utc::now())
    }

    pub fn build_at(
        feature: &Value,
        organization: &Organization,
        imported_at: DateTime<Utc>,
    ) -> Result<Self, EnvelopeError> {
        let name = display_name(feature)?;

        Ok(Self {
            id: Uuid::new_v4(),
            geojson: feature.clone(),
            restrictions: Map::new(),
            organization: organization.id.clone(),
            name,
            last_imported_at: format_imported_at(imported_at),
        })
    }
}

/// "TMK " followed by the feature's TMK property.
/// A `null` TMK counts as missing.
pub fn display_name(feature: &Value) -> Result<String, EnvelopeError> {
    let properties = feature
        .get("properties")
        .filter(|p| p.is_object())
        .ok_or(EnvelopeError::MissingProperties)?;

    let tmk = match properties.get(TMK_PROPERTY) {
        None | Some(Value::Null) => return Err(EnvelopeError::MissingTmk),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    Ok(format!("{}{}", NAME_PREFIX, tmk))
}

pub fn format_imported_at(at: DateTime<Utc>) -> String {
    at.format(IMPORTED_AT_FORMAT).to_string()
}
