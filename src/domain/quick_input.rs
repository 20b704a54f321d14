//! Quick input: a whole feature vector typed as one delimited string.
//!
//! Accepted forms, in declared feature order:
//! - `2, 120, 70, 30, 150, 28.5, 0.6, 45`
//! - `2 120 70 30 150 28.5 0.6 45`
//!
//! Commas win when present; whitespace is only used as a delimiter when the
//! input contains no comma at all.

use super::features::{Feature, FeatureVector, FEATURE_COUNT};

/// Why a quick-input string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuickInputError {
    #[error("Quick input must not be empty")]
    EmptyInput,

    #[error("Enter exactly {expected} values separated by commas or spaces (got {actual})")]
    WrongFieldCount { expected: usize, actual: usize },

    #[error("All values must be numbers ({feature}: {value:?})")]
    NonNumericValue { feature: Feature, value: String },
}

/// Parse a quick-input string into a complete [`FeatureVector`].
///
/// Either every field is filled or an error is returned; there is no
/// partially populated result.
///
/// # Errors
/// Returns [`QuickInputError`] describing the first problem found.
pub fn parse_quick_input(input: &str) -> Result<FeatureVector, QuickInputError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(QuickInputError::EmptyInput);
    }

    let mut tokens: Vec<&str> = trimmed.split(',').map(str::trim).collect();
    if tokens.len() == 1 && !trimmed.contains(',') {
        tokens = trimmed.split_whitespace().collect();
    }

    if tokens.len() != FEATURE_COUNT {
        return Err(QuickInputError::WrongFieldCount {
            expected: FEATURE_COUNT,
            actual: tokens.len(),
        });
    }

    for (feature, token) in Feature::ALL.iter().zip(&tokens) {
        if !is_finite_number(token) {
            return Err(QuickInputError::NonNumericValue {
                feature: *feature,
                value: (*token).to_string(),
            });
        }
    }

    let mut vector = FeatureVector::new();
    for (feature, token) in Feature::ALL.iter().zip(tokens) {
        vector.set(*feature, token);
    }
    Ok(vector)
}

fn is_finite_number(token: &str) -> bool {
    !token.is_empty() && token.parse::<f64>().map_or(false, f64::is_finite)
}
