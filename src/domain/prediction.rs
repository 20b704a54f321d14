//! Prediction result types.
//!
//! Represents what the remote classifier returns: a binary label plus the
//! performance metrics the service reports for its model. Metrics are shown
//! as received and never recomputed here.

use serde::{Deserialize, Serialize};

use super::model::ModelKind;

/// Binary diabetes classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    #[serde(rename = "Positif")]
    Positive,
    #[serde(rename = "Negatif")]
    Negative,
}

impl Classification {
    /// Get a human-readable description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Positive => "Indicators consistent with diabetes - clinical follow-up advised",
            Self::Negative => "No diabetes indicated by the model",
        }
    }

    /// Get the associated color for TUI display (RGB).
    #[must_use]
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::Positive => (220, 38, 38), // Red (#DC2626)
            Self::Negative => (22, 163, 74), // Green (#16A34A)
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "Diabetes: YES"),
            Self::Negative => write!(f, "Diabetes: NO"),
        }
    }
}

/// Model performance as reported by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Fraction in [0, 1]; the service may omit it
    pub accuracy: Option<f64>,

    /// Pre-formatted by the service
    pub precision: String,
    pub recall: String,
    pub f1_score: String,
}

impl PerformanceMetrics {
    /// Accuracy as a percentage. A missing accuracy reads as 0.
    #[must_use]
    pub fn accuracy_percent(&self) -> f64 {
        self.accuracy.unwrap_or(0.0) * 100.0
    }

    /// Accuracy formatted for display, e.g. `95.00%`.
    #[must_use]
    pub fn accuracy_display(&self) -> String {
        format!("{:.2}%", self.accuracy_percent())
    }

    #[must_use]
    pub fn accuracy_split(&self) -> AccuracySplit {
        AccuracySplit::from_accuracy(self.accuracy)
    }
}

/// Correct vs. incorrect proportion for the accuracy chart, in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccuracySplit {
    pub correct: f64,
    pub incorrect: f64,
}

impl AccuracySplit {
    /// Derive the chart proportions from a reported accuracy.
    ///
    /// Each share is rounded to two decimals. When the service reports no
    /// accuracy both shares are 0 and the chart is drawn empty.
    #[must_use]
    pub fn from_accuracy(accuracy: Option<f64>) -> Self {
        match accuracy {
            Some(acc) => Self {
                correct: round2(acc * 100.0),
                incorrect: round2((1.0 - acc) * 100.0),
            },
            None => Self {
                correct: 0.0,
                incorrect: 0.0,
            },
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.correct == 0.0 && self.incorrect == 0.0
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A completed prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Model that produced the prediction
    pub model: ModelKind,

    pub classification: Classification,

    pub metrics: PerformanceMetrics,

    /// When the response was received
    pub received_at: chrono::DateTime<chrono::Utc>,
}

impl PredictionResult {
    #[must_use]
    pub fn new(model: ModelKind, classification: Classification, metrics: PerformanceMetrics) -> Self {
        Self {
            model,
            classification,
            metrics,
            received_at: chrono::Utc::now(),
        }
    }
}
