//! Adapters layer: Concrete implementations of ports.
//!
//! - `http`: ureq client for the hosted prediction service
//! - `sanitize`: redaction of patient values in logs

pub mod http;
pub mod sanitize;

pub use http::HttpPredictor;
