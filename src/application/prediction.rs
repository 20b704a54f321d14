//! Prediction service: Orchestrates a single remote prediction.
//!
//! This service coordinates:
//! - Completeness check of the feature vector
//! - Delegation to the configured predictor
//! - Outcome logging (model and label only, never feature values)

use std::sync::Arc;

use crate::domain::{FeatureVector, ModelKind, PredictionResult};
use crate::ports::{PredictionError, Predictor};

/// Service for running predictions against a remote model.
pub struct PredictionService<P>
where
    P: Predictor,
{
    predictor: Arc<P>,
}

impl<P> PredictionService<P>
where
    P: Predictor,
{
    /// Create a new prediction service.
    pub fn new(predictor: Arc<P>) -> Self {
        Self { predictor }
    }

    /// Run one prediction.
    ///
    /// Every field must be filled; values are otherwise forwarded untouched.
    ///
    /// # Errors
    /// Returns `MissingField` for an incomplete vector, or whatever the
    /// predictor reports.
    pub fn predict(
        &self,
        model: ModelKind,
        features: &FeatureVector,
    ) -> Result<PredictionResult, PredictionError> {
        if let Some(feature) = features.missing() {
            return Err(PredictionError::MissingField(feature.label()));
        }

        tracing::info!(model = model.code(), "Requesting prediction");

        match self.predictor.predict(model, features) {
            Ok(result) => {
                tracing::info!(
                    "Prediction complete: model={}, label={:?}, accuracy={}",
                    model.code(),
                    result.classification,
                    result.metrics.accuracy_display()
                );
                Ok(result)
            }
            Err(e) => {
                tracing::warn!(model = model.code(), error = %e, "Prediction failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Classification, Feature, PerformanceMetrics};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory predictor returning a canned outcome and counting calls.
    struct FakePredictor {
        outcome: Result<(Classification, Option<f64>), PredictionError>,
        calls: AtomicUsize,
    }

    impl FakePredictor {
        fn ok(classification: Classification, accuracy: Option<f64>) -> Self {
            Self {
                outcome: Ok((classification, accuracy)),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(error: PredictionError) -> Self {
            Self {
                outcome: Err(error),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Predictor for FakePredictor {
        fn predict(
            &self,
            model: ModelKind,
            _features: &FeatureVector,
        ) -> Result<PredictionResult, PredictionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let (classification, accuracy) = self.outcome.clone()?;
            Ok(PredictionResult::new(
                model,
                classification,
                PerformanceMetrics {
                    accuracy,
                    precision: "0.90".to_string(),
                    recall: "0.85".to_string(),
                    f1_score: "0.87".to_string(),
                },
            ))
        }
    }

    #[test]
    fn test_predict_delegates_once() {
        let fake = Arc::new(FakePredictor::ok(Classification::Negative, Some(0.77)));
        let service = PredictionService::new(fake.clone());

        let result = service
            .predict(ModelKind::XgBoost, &FeatureVector::sample())
            .expect("Should predict");

        assert_eq!(result.model, ModelKind::XgBoost);
        assert_eq!(result.classification, Classification::Negative);
        assert_eq!(fake.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_incomplete_vector_not_sent() {
        let fake = Arc::new(FakePredictor::ok(Classification::Positive, Some(0.9)));
        let service = PredictionService::new(fake.clone());

        let mut features = FeatureVector::sample();
        features.set(Feature::Insulin, "");

        let err = service
            .predict(ModelKind::RandomForest, &features)
            .unwrap_err();
        assert_eq!(err, PredictionError::MissingField("Insulin"));
        assert_eq!(fake.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_errors_are_not_retried() {
        let fake = Arc::new(FakePredictor::failing(PredictionError::Network { status: 502 }));
        let service = PredictionService::new(fake.clone());

        let err = service
            .predict(ModelKind::RandomForest, &FeatureVector::sample())
            .unwrap_err();
        assert_eq!(err, PredictionError::Network { status: 502 });
        assert_eq!(fake.calls.load(Ordering::SeqCst), 1);
    }
}
