//! # diapredict
//!
//! Terminal client for hosted diabetes prediction models.
//!
//! This crate provides:
//! - The eight-feature input schema and quick-input parsing
//! - A client for the remote Random Forest / XGBoost prediction service
//! - Terminal UI to enter data and review predictions with model metrics
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (FeatureVector, PredictionResult, ModelKind)
//! - `ports`: Trait definitions for external operations (Predictor)
//! - `adapters`: Concrete implementations (ureq HTTP client, log sanitizer)
//! - `application`: Use cases and per-screen session state
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{Classification, Feature, FeatureVector, ModelKind, PredictionResult};

/// Result type for diapredict operations
pub type Result<T> = std::result::Result<T, DiapredictError>;

/// Main error type for diapredict
#[derive(Debug, thiserror::Error)]
pub enum DiapredictError {
    #[error("Invalid quick input: {0}")]
    QuickInput(#[from] domain::QuickInputError),

    #[error("Prediction failed: {0}")]
    Prediction(#[from] ports::PredictionError),
}

impl DiapredictError {
    /// Message shown to the user.
    ///
    /// The inner error is shown bare so the service's own wording reaches
    /// the screen unchanged.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::QuickInput(e) => e.to_string(),
            Self::Prediction(e) => e.to_string(),
        }
    }
}
