//! TUI module: Terminal User Interface using Ratatui.
//!
//! Provides:
//! - Model selection on the home screen
//! - A prediction form per model with quick input
//! - A result popup with the accuracy chart and metrics

mod app;
mod styles;
mod ui;
mod worker;

pub use app::{App, Screen};
pub use styles::MedicalTheme;
pub use worker::{PredictionProgress, PredictionWorker, PredictionWorkerHandle};
