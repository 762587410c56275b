pub mod feature;

pub use feature::{EnvelopeError, FeatureEnvelope, Organization};
