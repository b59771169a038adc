//! Pipeline worker - a dedicated thread draining the observation queue

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use signa_core::{Observation, SignaError, SignaResult};
use tokio::sync::mpsc;

use crate::GesturePipeline;

pub type ObservationSender = mpsc::UnboundedSender<Observation>;
pub type ObservationReceiver = mpsc::UnboundedReceiver<Observation>;

/// Runs pipeline cycles one at a time, in arrival order
///
/// The thread exits once every `ObservationSender` has been dropped.
#[derive(Debug)]
pub struct PipelineWorker {
    sender: ObservationSender,
    handle: JoinHandle<u64>,
}

impl PipelineWorker {
    pub fn spawn(pipeline: Arc<GesturePipeline>) -> SignaResult<Self> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let handle = thread::Builder::new()
            .name("signa-pipeline".into())
            .spawn(move || run(pipeline, receiver))
            .map_err(|e| SignaError::Worker(e.to_string()))?;

        tracing::debug!("pipeline worker started");
        Ok(Self { sender, handle })
    }

    /// Handle for producers, e.g. the detector bridge
    pub fn sender(&self) -> ObservationSender {
        self.sender.clone()
    }

    /// Queue an observation; fails only if the worker has stopped
    pub fn submit(&self, observation: Observation) -> SignaResult<()> {
        self.sender
            .send(observation)
            .map_err(|_| SignaError::Worker("worker stopped".into()))
    }

    /// Drop this handle's sender and wait for the queue to drain
    ///
    /// Blocks until every other sender is dropped too. Returns the number
    /// of observations processed.
    pub fn join(self) -> SignaResult<u64> {
        drop(self.sender);
        self.handle
            .join()
            .map_err(|payload| SignaError::Worker(panic_message(payload.as_ref())))
    }
}

fn run(pipeline: Arc<GesturePipeline>, mut receiver: ObservationReceiver) -> u64 {
    let mut processed = 0;
    while let Some(observation) = receiver.blocking_recv() {
        let cycle =
            panic::catch_unwind(AssertUnwindSafe(|| pipeline.add_observation(&observation)));
        if let Err(payload) = cycle {
            pipeline.report_panic(observation.timestamp, &panic_message(payload.as_ref()));
        }
        processed += 1;
    }
    tracing::debug!(processed, "pipeline worker stopped");
    processed
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
