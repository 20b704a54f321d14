//! HTTP adapter: Implementation of Predictor over the remote JSON API.
//!
//! Wire contract (per model endpoint):
//!
//! ```text
//! POST <endpoint>
//! { "pregnancies": "2", "glucose": "120", ..., "skinThickness": "30", ... }
//!
//! 200 OK
//! { "kode": 200, "prediksi": "Positif" | "Negatif",
//!   "performa_model": { "acc": 0.95 | null, "precision": "...", "recall": "...", "f1_score": "..." },
//!   "error": "..." }
//! ```
//!
//! `kode` other than 200 is a service-level failure even when the HTTP
//! status is a success.

use std::io::{self, Read};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::domain::{
    Classification, Feature, FeatureVector, ModelKind, PerformanceMetrics, PredictionResult,
};
use crate::ports::{PredictionError, Predictor};

/// Service code signalling a successful prediction.
const SERVICE_OK: f64 = 200.0;

const DEFAULT_SERVICE_ERROR: &str = "Prediction failed";

const MAX_RESPONSE_BYTES: usize = 64 * 1024;

/// Request body. Values are forwarded as entered, not coerced to numbers.
#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    pregnancies: &'a str,
    glucose: &'a str,
    bloodpressure: &'a str,
    #[serde(rename = "skinThickness")]
    skinthickness: &'a str,
    insulin: &'a str,
    bmi: &'a str,
    diabetespedigreefunction: &'a str,
    age: &'a str,
}

impl<'a> From<&'a FeatureVector> for PredictRequest<'a> {
    fn from(v: &'a FeatureVector) -> Self {
        Self {
            pregnancies: v.get(Feature::Pregnancies),
            glucose: v.get(Feature::Glucose),
            bloodpressure: v.get(Feature::BloodPressure),
            skinthickness: v.get(Feature::SkinThickness),
            insulin: v.get(Feature::Insulin),
            bmi: v.get(Feature::Bmi),
            diabetespedigreefunction: v.get(Feature::DiabetesPedigreeFunction),
            age: v.get(Feature::Age),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PredictResponseWire {
    #[serde(default)]
    kode: Option<Value>,
    prediksi: Option<String>,
    performa_model: Option<PerformanceWire>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct PerformanceWire {
    #[serde(default)]
    acc: Option<f64>,
    #[serde(default)]
    precision: Option<Value>,
    #[serde(default)]
    recall: Option<Value>,
    #[serde(default)]
    f1_score: Option<Value>,
}

/// Predictor backed by the hosted HTTP service.
pub struct HttpPredictor {
    agent: ureq::Agent,
    config: ClientConfig,
}

impl HttpPredictor {
    /// Create a predictor with a dedicated agent using the configured timeouts.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(config.timeout)
            .timeout_read(config.timeout)
            .timeout_write(config.timeout)
            .build();
        Self { agent, config }
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl Predictor for HttpPredictor {
    fn predict(
        &self,
        model: ModelKind,
        features: &FeatureVector,
    ) -> Result<PredictionResult, PredictionError> {
        let url = self.config.endpoint(model);
        tracing::debug!(model = model.code(), url, "Sending prediction request");

        let request = self
            .agent
            .post(url)
            .set("Accept", "application/json")
            .set("Content-Type", "application/json");

        let response = match request.send_json(PredictRequest::from(features)) {
            Ok(response) => response,
            Err(ureq::Error::Status(status, _)) => {
                return Err(PredictionError::Network { status });
            }
            Err(ureq::Error::Transport(err)) => {
                return Err(PredictionError::Transport(err.to_string()));
            }
        };

        let body = read_body_limited(response, MAX_RESPONSE_BYTES)
            .map_err(|e| PredictionError::InvalidResponse(e.to_string()))?;
        parse_predict_response(model, &body)
    }
}

/// Map a response body to a prediction or a service error.
fn parse_predict_response(model: ModelKind, body: &[u8]) -> Result<PredictionResult, PredictionError> {
    let wire: PredictResponseWire = serde_json::from_slice(body)
        .map_err(|e| PredictionError::InvalidResponse(e.to_string()))?;

    if !is_service_ok(wire.kode.as_ref()) {
        let message = service_message(wire.error)
            .unwrap_or_else(|| DEFAULT_SERVICE_ERROR.to_string());
        return Err(PredictionError::Service(message));
    }

    let label = wire
        .prediksi
        .ok_or_else(|| PredictionError::InvalidResponse("missing 'prediksi'".to_string()))?;
    let classification = match label.as_str() {
        "Positif" => Classification::Positive,
        "Negatif" => Classification::Negative,
        other => {
            return Err(PredictionError::InvalidResponse(format!(
                "unknown label {other:?}"
            )))
        }
    };

    let performance = wire
        .performa_model
        .ok_or_else(|| PredictionError::InvalidResponse("missing 'performa_model'".to_string()))?;

    let metrics = PerformanceMetrics {
        accuracy: performance.acc,
        precision: metric_text(performance.precision),
        recall: metric_text(performance.recall),
        f1_score: metric_text(performance.f1_score),
    };

    Ok(PredictionResult::new(model, classification, metrics))
}

/// Only a numeric `kode` equal to 200 counts as success (`200` and `200.0`
/// alike). Strings, missing codes and anything else are failures.
fn is_service_ok(kode: Option<&Value>) -> bool {
    kode.and_then(Value::as_f64) == Some(SERVICE_OK)
}

/// Service error text; non-string payloads are shown as their JSON text.
fn service_message(error: Option<Value>) -> Option<String> {
    match error? {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::String(_) | Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Metrics arrive pre-formatted; anything else is shown as its JSON text.
fn metric_text(value: Option<Value>) -> String {
    match value {
        Some(Value::String(s)) => s,
        Some(Value::Null) | None => "-".to_string(),
        Some(other) => other.to_string(),
    }
}

fn read_body_limited(response: ureq::Response, max_bytes: usize) -> Result<Vec<u8>, io::Error> {
    let mut limited = response.into_reader().take(max_bytes as u64 + 1);
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes)?;
    if bytes.len() > max_bytes {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Response exceeded {max_bytes} bytes"),
        ));
    }
    Ok(bytes)
}
