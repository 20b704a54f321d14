//! Per-screen prediction session.
//!
//! Owns the form values, the quick-input buffer and the outcome of the last
//! request for one model screen. Requests are tagged with a generation so a
//! response that arrives after a reset (or for a superseded request) is
//! dropped instead of overwriting newer state.

use zeroize::Zeroize;

use crate::domain::{parse_quick_input, Feature, FeatureVector, ModelKind, PredictionResult};
use crate::ports::PredictionError;
use crate::DiapredictError;

/// What the screen currently shows below the form.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Outcome {
    #[default]
    None,
    Result(PredictionResult),
    Error(String),
}

/// A request ready to be sent: snapshot of the form plus its generation.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub model: ModelKind,
    pub generation: u64,
    pub features: FeatureVector,
}

/// Form state holder for one model screen.
#[derive(Debug)]
pub struct PredictionSession {
    model: ModelKind,
    form: FeatureVector,
    quick_input: String,
    outcome: Outcome,
    generation: u64,
    in_flight: Option<u64>,
}

impl PredictionSession {
    #[must_use]
    pub fn new(model: ModelKind) -> Self {
        Self {
            model,
            form: FeatureVector::new(),
            quick_input: String::new(),
            outcome: Outcome::None,
            generation: 0,
            in_flight: None,
        }
    }

    #[must_use]
    pub fn model(&self) -> ModelKind {
        self.model
    }

    #[must_use]
    pub fn form(&self) -> &FeatureVector {
        &self.form
    }

    #[must_use]
    pub fn quick_input(&self) -> &str {
        &self.quick_input
    }

    #[must_use]
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Error(message) => Some(message),
            _ => None,
        }
    }

    #[must_use]
    pub fn result(&self) -> Option<&PredictionResult> {
        match &self.outcome {
            Outcome::Result(result) => Some(result),
            _ => None,
        }
    }

    /// Whether a request is outstanding (submit is disabled meanwhile).
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn set_field(&mut self, feature: Feature, value: impl Into<String>) {
        self.form.set(feature, value);
    }

    /// Append a character to a field. Only characters that can appear in a
    /// number accepted by quick input are taken (sign, decimal point,
    /// exponent).
    pub fn push_char(&mut self, feature: Feature, c: char) {
        if c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E') {
            self.form.field_mut(feature).push(c);
        }
    }

    pub fn pop_char(&mut self, feature: Feature) {
        self.form.field_mut(feature).pop();
    }

    pub fn clear_field(&mut self, feature: Feature) {
        self.form.field_mut(feature).zeroize();
    }

    pub fn set_quick_input(&mut self, text: impl Into<String>) {
        self.quick_input = text.into();
    }

    pub fn push_quick_input(&mut self, c: char) {
        self.quick_input.push(c);
    }

    pub fn pop_quick_input(&mut self) {
        self.quick_input.pop();
    }

    /// Fill the form with the example patient.
    pub fn load_sample(&mut self) {
        self.form = FeatureVector::sample();
    }

    /// Parse the quick-input buffer into the form.
    ///
    /// On success the whole form is replaced at once and any error is
    /// cleared. On failure the form is left untouched and the error is shown.
    ///
    /// # Errors
    /// Returns the parser error that was displayed.
    pub fn apply_quick_input(&mut self) -> Result<(), DiapredictError> {
        match parse_quick_input(&self.quick_input) {
            Ok(features) => {
                self.form = features;
                if matches!(self.outcome, Outcome::Error(_)) {
                    self.outcome = Outcome::None;
                }
                Ok(())
            }
            Err(e) => {
                let err = DiapredictError::from(e);
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// Start a request for the current form.
    ///
    /// Returns `None` while another request is in flight. Clears a previous
    /// error, as a new attempt supersedes it.
    pub fn begin_request(&mut self) -> Option<PendingRequest> {
        if self.in_flight.is_some() {
            return None;
        }
        self.generation += 1;
        self.in_flight = Some(self.generation);
        if matches!(self.outcome, Outcome::Error(_)) {
            self.outcome = Outcome::None;
        }
        Some(PendingRequest {
            model: self.model,
            generation: self.generation,
            features: self.form.clone(),
        })
    }

    /// Apply the outcome of the request tagged `generation`.
    ///
    /// Returns `false` (and changes nothing) if the response is stale.
    pub fn complete(
        &mut self,
        generation: u64,
        outcome: Result<PredictionResult, PredictionError>,
    ) -> bool {
        if self.in_flight != Some(generation) {
            tracing::debug!(
                model = self.model.code(),
                generation,
                current = self.generation,
                "Discarding stale prediction response"
            );
            return false;
        }
        self.in_flight = None;

        match outcome {
            Ok(result) => self.outcome = Outcome::Result(result),
            Err(e) => self.fail(&DiapredictError::from(e)),
        }
        true
    }

    /// Close the result popup. An error message, if any, stays.
    pub fn dismiss_result(&mut self) {
        if matches!(self.outcome, Outcome::Result(_)) {
            self.outcome = Outcome::None;
        }
    }

    /// Clear the form, the quick-input buffer and any outcome.
    ///
    /// An outstanding request is not cancelled; its response will be
    /// discarded when it arrives.
    pub fn reset(&mut self) {
        self.form.clear();
        self.quick_input.zeroize();
        self.outcome = Outcome::None;
        self.in_flight = None;
        self.generation += 1;
    }

    fn fail(&mut self, err: &DiapredictError) {
        tracing::warn!(model = self.model.code(), "{}", err);
        self.outcome = Outcome::Error(err.user_message());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Classification, PerformanceMetrics, QuickInputError};

    fn result(model: ModelKind) -> PredictionResult {
        PredictionResult::new(
            model,
            Classification::Positive,
            PerformanceMetrics {
                accuracy: Some(0.95),
                precision: "0.93".to_string(),
                recall: "0.91".to_string(),
                f1_score: "0.92".to_string(),
            },
        )
    }

    #[test]
    fn test_quick_input_replaces_form() {
        let mut session = PredictionSession::new(ModelKind::RandomForest);
        session.set_field(Feature::Glucose, "999");
        session.set_quick_input("2, 120, 70, 30, 150, 28.5, 0.6, 45");

        session.apply_quick_input().expect("Should apply");

        assert_eq!(session.form(), &FeatureVector::sample());
        assert!(session.error().is_none());
    }

    #[test]
    fn test_quick_input_failure_keeps_form() {
        let mut session = PredictionSession::new(ModelKind::RandomForest);
        session.set_field(Feature::Glucose, "140");
        session.set_quick_input("1,2,3");

        let err = session.apply_quick_input().unwrap_err();
        assert!(matches!(
            err,
            DiapredictError::QuickInput(QuickInputError::WrongFieldCount { expected: 8, actual: 3 })
        ));
        assert_eq!(session.form().get(Feature::Glucose), "140");
        assert_eq!(session.form().get(Feature::Age), "");
        assert!(session
            .error()
            .expect("Should show error")
            .contains("exactly 8"));
    }

    #[test]
    fn test_successful_parse_clears_previous_error() {
        let mut session = PredictionSession::new(ModelKind::XgBoost);
        session.set_quick_input("");
        assert!(session.apply_quick_input().is_err());
        assert_eq!(session.error(), Some("Quick input must not be empty"));

        session.set_quick_input("2 120 70 30 150 28.5 0.6 45");
        session.apply_quick_input().expect("Should apply");
        assert!(session.error().is_none());
    }

    #[test]
    fn test_request_lifecycle() {
        let mut session = PredictionSession::new(ModelKind::RandomForest);
        session.load_sample();

        let pending = session.begin_request().expect("Should start");
        assert!(session.is_loading());
        assert_eq!(pending.features, FeatureVector::sample());
        assert!(session.begin_request().is_none(), "Submit disabled while loading");

        assert!(session.complete(pending.generation, Ok(result(ModelKind::RandomForest))));
        assert!(!session.is_loading());
        assert_eq!(
            session.result().expect("Should show result").classification,
            Classification::Positive
        );
    }

    #[test]
    fn test_service_error_message_shown_verbatim() {
        let mut session = PredictionSession::new(ModelKind::RandomForest);
        session.load_sample();
        let pending = session.begin_request().expect("Should start");

        session.complete(
            pending.generation,
            Err(PredictionError::Service("model unavailable".to_string())),
        );

        assert_eq!(session.error(), Some("model unavailable"));
        assert!(session.result().is_none());
    }

    #[test]
    fn test_stale_response_after_reset_is_discarded() {
        let mut session = PredictionSession::new(ModelKind::XgBoost);
        session.load_sample();
        let pending = session.begin_request().expect("Should start");

        session.reset();
        assert!(!session.is_loading());
        assert!(session.form().is_empty());

        assert!(!session.complete(pending.generation, Ok(result(ModelKind::XgBoost))));
        assert_eq!(session.outcome(), &Outcome::None);
    }

    #[test]
    fn test_superseded_request_is_discarded() {
        let mut session = PredictionSession::new(ModelKind::RandomForest);
        session.load_sample();
        let first = session.begin_request().expect("Should start");
        session.complete(first.generation, Err(PredictionError::Network { status: 500 }));

        let second = session.begin_request().expect("Should start again");
        assert!(session.error().is_none(), "New attempt clears the old error");
        assert!(!session.complete(first.generation, Ok(result(ModelKind::RandomForest))));
        assert!(session.is_loading());
        assert!(session.complete(second.generation, Ok(result(ModelKind::RandomForest))));
    }

    #[test]
    fn test_dismiss_result_leaves_form() {
        let mut session = PredictionSession::new(ModelKind::RandomForest);
        session.load_sample();
        let pending = session.begin_request().expect("Should start");
        session.complete(pending.generation, Ok(result(ModelKind::RandomForest)));

        session.dismiss_result();
        assert_eq!(session.outcome(), &Outcome::None);
        assert_eq!(session.form(), &FeatureVector::sample());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = PredictionSession::new(ModelKind::RandomForest);
        session.set_quick_input("1,2");
        let _ = session.apply_quick_input();
        session.load_sample();

        session.reset();

        assert!(session.form().is_empty());
        assert_eq!(session.quick_input(), "");
        assert_eq!(session.outcome(), &Outcome::None);
    }

    #[test]
    fn test_field_editing_filters_characters() {
        let mut session = PredictionSession::new(ModelKind::RandomForest);
        for c in "2a8.5x".chars() {
            session.push_char(Feature::Bmi, c);
        }
        assert_eq!(session.form().get(Feature::Bmi), "28.5");
        session.pop_char(Feature::Bmi);
        assert_eq!(session.form().get(Feature::Bmi), "28.");
        session.clear_field(Feature::Bmi);
        assert_eq!(session.form().get(Feature::Bmi), "");
    }

    #[test]
    fn test_field_editing_matches_quick_input_alphabet() {
        let mut session = PredictionSession::new(ModelKind::RandomForest);
        for c in "+5".chars() {
            session.push_char(Feature::Pregnancies, c);
        }
        for c in "1e2".chars() {
            session.push_char(Feature::Glucose, c);
        }
        for c in "2.5E-1".chars() {
            session.push_char(Feature::DiabetesPedigreeFunction, c);
        }
        assert_eq!(session.form().get(Feature::Pregnancies), "+5");
        assert_eq!(session.form().get(Feature::Glucose), "1e2");
        assert_eq!(session.form().get(Feature::DiabetesPedigreeFunction), "2.5E-1");

        // Every typed value is one the quick-input parser would accept too.
        session.set_quick_input("+5 1e2 70 30 150 28.5 2.5E-1 45");
        session.apply_quick_input().expect("Should apply");
        assert_eq!(session.form().get(Feature::Glucose), "1e2");
    }
}
