//! Background worker for non-blocking prediction requests.
//!
//! The HTTP call blocks, so it runs on its own thread and reports back over
//! a channel that the TUI main loop polls every tick.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::application::{PendingRequest, PredictionService};
use crate::domain::{ModelKind, PredictionResult};
use crate::ports::{PredictionError, Predictor};

/// Progress updates from the prediction worker.
#[derive(Debug, Clone)]
pub enum PredictionProgress {
    /// Request is on the wire
    Sending,
    /// Request finished (successfully or not)
    Complete {
        generation: u64,
        outcome: Result<PredictionResult, PredictionError>,
    },
}

/// Handle to a running prediction worker.
pub struct PredictionWorkerHandle {
    /// Model screen that owns the request
    pub model: ModelKind,
    /// Generation of the request this worker carries
    pub generation: u64,
    /// Receiver for progress updates
    pub progress_rx: Receiver<PredictionProgress>,
    /// Thread handle (for joining)
    _handle: JoinHandle<()>,
}

impl PredictionWorkerHandle {
    /// Try to receive the next progress update (non-blocking).
    ///
    /// `Err(TryRecvError::Disconnected)` means the thread exited without
    /// reporting a completion.
    pub fn try_recv(&self) -> Result<PredictionProgress, TryRecvError> {
        self.progress_rx.try_recv()
    }
}

/// Worker that runs a prediction request in the background.
pub struct PredictionWorker;

impl PredictionWorker {
    /// Spawn a background prediction.
    ///
    /// Returns a handle to receive progress updates.
    pub fn spawn<P>(
        service: Arc<PredictionService<P>>,
        request: PendingRequest,
    ) -> PredictionWorkerHandle
    where
        P: Predictor + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let model = request.model;
        let generation = request.generation;

        let handle = thread::spawn(move || {
            Self::run_with_progress(&service, request, &tx);
        });

        PredictionWorkerHandle {
            model,
            generation,
            progress_rx: rx,
            _handle: handle,
        }
    }

    fn run_with_progress<P: Predictor>(
        service: &PredictionService<P>,
        request: PendingRequest,
        tx: &Sender<PredictionProgress>,
    ) {
        let _ = tx.send(PredictionProgress::Sending);

        let outcome = service.predict(request.model, &request.features);

        // The UI may have gone away; nothing to report to then.
        let _ = tx.send(PredictionProgress::Complete {
            generation: request.generation,
            outcome,
        });
    }
}
