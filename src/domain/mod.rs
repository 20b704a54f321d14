//! Domain layer: Core business types and logic.
//!
//! Pure types with no I/O: the feature schema, quick-input parsing and the
//! shape of a prediction result.

mod features;
mod model;
mod prediction;
pub mod quick_input;

pub use features::{Feature, FeatureVector, FEATURE_COUNT};
pub use model::ModelKind;
pub use prediction::{AccuracySplit, Classification, PerformanceMetrics, PredictionResult};
pub use quick_input::{parse_quick_input, QuickInputError};
