//! Remote model variants.

use serde::{Deserialize, Serialize};

/// Which remote classifier a prediction is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    RandomForest,
    XgBoost,
}

impl ModelKind {
    pub const ALL: [ModelKind; 2] = [ModelKind::XgBoost, ModelKind::RandomForest];

    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::RandomForest => "Random Forest",
            Self::XgBoost => "XGBoost",
        }
    }

    /// Short identifier used in logs and config keys.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::RandomForest => "rf",
            Self::XgBoost => "xgboost",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::RandomForest => {
                "Ensemble of decision trees voting on the outcome. Robust to noisy \
                 measurements and a solid baseline for tabular medical data."
            }
            Self::XgBoost => {
                "Gradient-boosted decision trees. Efficient and accurate, designed to \
                 give high-performing predictions even on small datasets."
            }
        }
    }

    /// Endpoint path relative to the service base URL.
    #[must_use]
    pub fn default_path(self) -> &'static str {
        match self {
            Self::RandomForest => "/api/predict-rf",
            Self::XgBoost => "/api/predict-xgboost",
        }
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
