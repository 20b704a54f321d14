//! Predictor port: Trait for remote model inference.
//!
//! This trait abstracts the transport (HTTP, specific URLs) from the
//! application logic so it can be swapped or faked in tests.

use crate::domain::{FeatureVector, ModelKind, PredictionResult};

/// Errors that can occur while obtaining a prediction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PredictionError {
    /// Non-success HTTP status from the service.
    #[error("Network error: HTTP {status}")]
    Network { status: u16 },

    /// The request never got a status (connection, DNS, TLS, timeout).
    #[error("Connection failed: {0}")]
    Transport(String),

    /// The service answered but reported a failure.
    #[error("{0}")]
    Service(String),

    #[error("Unexpected response from prediction service: {0}")]
    InvalidResponse(String),

    #[error("Field '{0}' is empty")]
    MissingField(&'static str),
}

/// Trait for obtaining predictions from a classifier.
///
/// Implementations perform exactly one request per call, with no retries.
/// Calls block; callers run them off the UI thread.
pub trait Predictor: Send + Sync {
    /// Classify a complete feature vector with the given model.
    ///
    /// # Errors
    /// Returns [`PredictionError`] on transport or service failure.
    fn predict(
        &self,
        model: ModelKind,
        features: &FeatureVector,
    ) -> Result<PredictionResult, PredictionError>;
}
