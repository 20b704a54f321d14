//! Feature schema for diabetes risk prediction.
//!
//! Based on the Pima Indians Diabetes dataset: eight clinical measurements
//! in a fixed order shared by both remote models.

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Number of features every model expects.
pub const FEATURE_COUNT: usize = 8;

/// One of the eight clinical features, in declared order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    Pregnancies,
    Glucose,
    BloodPressure,
    SkinThickness,
    Insulin,
    Bmi,
    DiabetesPedigreeFunction,
    Age,
}

impl Feature {
    /// All features in the order the models (and quick input) expect.
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::Pregnancies,
        Feature::Glucose,
        Feature::BloodPressure,
        Feature::SkinThickness,
        Feature::Insulin,
        Feature::Bmi,
        Feature::DiabetesPedigreeFunction,
        Feature::Age,
    ];

    /// Position of this feature in [`Feature::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Internal field name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Pregnancies => "pregnancies",
            Self::Glucose => "glucose",
            Self::BloodPressure => "bloodpressure",
            Self::SkinThickness => "skinthickness",
            Self::Insulin => "insulin",
            Self::Bmi => "bmi",
            Self::DiabetesPedigreeFunction => "diabetespedigreefunction",
            Self::Age => "age",
        }
    }

    /// Key used by the remote prediction service.
    ///
    /// Matches [`Feature::name`] except for skin thickness, which the
    /// service expects in camel case.
    #[must_use]
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::SkinThickness => "skinThickness",
            other => other.name(),
        }
    }

    /// Human-readable label for the form.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Pregnancies => "Pregnancies",
            Self::Glucose => "Glucose",
            Self::BloodPressure => "Blood Pressure",
            Self::SkinThickness => "Skin Thickness",
            Self::Insulin => "Insulin",
            Self::Bmi => "BMI",
            Self::DiabetesPedigreeFunction => "Diabetes Pedigree Function",
            Self::Age => "Age",
        }
    }

    /// Placeholder shown while the field is empty.
    #[must_use]
    pub fn hint(self) -> &'static str {
        match self {
            Self::Pregnancies => "count",
            Self::Glucose => "mg/dL (2h OGTT)",
            Self::BloodPressure => "diastolic mmHg",
            Self::SkinThickness => "triceps fold, mm",
            Self::Insulin => "2h serum, mu U/ml",
            Self::Bmi => "kg/m²",
            Self::DiabetesPedigreeFunction => "family history score",
            Self::Age => "years",
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The eight feature values, kept as raw text until submission.
///
/// Values are forwarded to the service exactly as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: [String; FEATURE_COUNT],
}

impl FeatureVector {
    /// Create an empty vector (all fields blank).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a vector from values in declared order.
    #[must_use]
    pub fn from_values(values: [String; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    /// Example patient used by the "load sample" shortcut.
    #[must_use]
    pub fn sample() -> Self {
        Self::from_values(
            ["2", "120", "70", "30", "150", "28.5", "0.6", "45"].map(String::from),
        )
    }

    #[must_use]
    pub fn get(&self, feature: Feature) -> &str {
        &self.values[feature.index()]
    }

    pub fn set(&mut self, feature: Feature, value: impl Into<String>) {
        self.values[feature.index()] = value.into();
    }

    /// Mutable access to a single field buffer (for character editing).
    pub fn field_mut(&mut self, feature: Feature) -> &mut String {
        &mut self.values[feature.index()]
    }

    /// Iterate `(feature, raw value)` pairs in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (Feature, &str)> {
        Feature::ALL
            .iter()
            .map(move |&feature| (feature, self.get(feature)))
    }

    /// First field left blank, if any.
    #[must_use]
    pub fn missing(&self) -> Option<Feature> {
        self.iter()
            .find(|(_, value)| value.trim().is_empty())
            .map(|(feature, _)| feature)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing().is_none()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(String::is_empty)
    }

    /// Wipe every field buffer.
    pub fn clear(&mut self) {
        for value in self.values.iter_mut() {
            value.zeroize();
        }
    }
}
