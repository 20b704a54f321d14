//! Runtime configuration from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `DIAPREDICT_API_BASE_URL` | `https://web-production-39361.up.railway.app` |
//! | `DIAPREDICT_RF_URL` | base + `/api/predict-rf` |
//! | `DIAPREDICT_XGBOOST_URL` | base + `/api/predict-xgboost` |
//! | `DIAPREDICT_HTTP_TIMEOUT_SECS` | `30` |

use std::time::Duration;

use crate::domain::ModelKind;

pub const DEFAULT_API_BASE_URL: &str = "https://web-production-39361.up.railway.app";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const API_BASE_URL_ENV: &str = "DIAPREDICT_API_BASE_URL";
const RF_URL_ENV: &str = "DIAPREDICT_RF_URL";
const XGBOOST_URL_ENV: &str = "DIAPREDICT_XGBOOST_URL";
const TIMEOUT_ENV: &str = "DIAPREDICT_HTTP_TIMEOUT_SECS";

/// Error type for configuration loading.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}: invalid value {value:?} ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("{var}: {value:?} is not an http(s) URL")]
    InvalidUrl { var: &'static str, value: String },
}

/// Endpoints and transport settings for the prediction client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub random_forest_url: String,
    pub xgboost_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            random_forest_url: join_url(DEFAULT_API_BASE_URL, ModelKind::RandomForest.default_path()),
            xgboost_url: join_url(DEFAULT_API_BASE_URL, ModelKind::XgBoost.default_path()),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if a variable is set to an unusable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let base = match get(API_BASE_URL_ENV) {
            Some(base) => validate_url(API_BASE_URL_ENV, base)?,
            None => DEFAULT_API_BASE_URL.to_string(),
        };

        let endpoint = |var: &'static str, model: ModelKind| -> Result<String, ConfigError> {
            match get(var) {
                Some(url) => validate_url(var, url),
                None => Ok(join_url(&base, model.default_path())),
            }
        };

        let random_forest_url = endpoint(RF_URL_ENV, ModelKind::RandomForest)?;
        let xgboost_url = endpoint(XGBOOST_URL_ENV, ModelKind::XgBoost)?;

        let timeout = match get(TIMEOUT_ENV) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: TIMEOUT_ENV,
                        value: raw,
                        reason: "expected a positive number of seconds",
                    })
                }
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            random_forest_url,
            xgboost_url,
            timeout,
        })
    }

    /// Endpoint for the given model.
    #[must_use]
    pub fn endpoint(&self, model: ModelKind) -> &str {
        match model {
            ModelKind::RandomForest => &self.random_forest_url,
            ModelKind::XgBoost => &self.xgboost_url,
        }
    }
}

fn validate_url(var: &'static str, value: String) -> Result<String, ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(value)
    } else {
        Err(ConfigError::InvalidUrl { var, value })
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup(lookup_from(&[])).expect("Should load");
        assert_eq!(config, ClientConfig::default());
        assert_eq!(
            config.endpoint(ModelKind::RandomForest),
            "https://web-production-39361.up.railway.app/api/predict-rf"
        );
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_base_url_override() {
        let config = ClientConfig::from_lookup(lookup_from(&[(
            "DIAPREDICT_API_BASE_URL",
            "http://localhost:5000/",
        )]))
        .expect("Should load");
        assert_eq!(config.random_forest_url, "http://localhost:5000/api/predict-rf");
        assert_eq!(config.xgboost_url, "http://localhost:5000/api/predict-xgboost");
    }

    #[test]
    fn test_model_url_override_wins() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("DIAPREDICT_API_BASE_URL", "http://localhost:5000"),
            ("DIAPREDICT_XGBOOST_URL", "http://models.internal/xgb"),
        ]))
        .expect("Should load");
        assert_eq!(config.endpoint(ModelKind::XgBoost), "http://models.internal/xgb");
        assert_eq!(
            config.endpoint(ModelKind::RandomForest),
            "http://localhost:5000/api/predict-rf"
        );
    }

    #[test]
    fn test_invalid_values() {
        let err = ClientConfig::from_lookup(lookup_from(&[("DIAPREDICT_RF_URL", "ftp://x")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { var: "DIAPREDICT_RF_URL", .. }));

        let err = ClientConfig::from_lookup(lookup_from(&[(
            "DIAPREDICT_HTTP_TIMEOUT_SECS",
            "0",
        )]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = ClientConfig::from_lookup(lookup_from(&[("DIAPREDICT_API_BASE_URL", "  ")]))
            .expect("Should load");
        assert_eq!(config, ClientConfig::default());
    }
}
