pub mod client;

pub use client::{resolve_organization, ApiClient, ApiError, CreateResponse, FeatureApi};
