//! Gesture pipeline - the serialized processing cycle
//!
//! One cycle per observation, entirely under the pipeline lock:
//!
//! 1. drop the observation if no classifier session is open
//! 2. extract features (updates the extractor state)
//! 3. append to the window; stop unless a full span is available
//! 4. emptiness gate: reset window, stabilizer and extractor, stop
//! 5. resample and classify
//! 6. stabilize, and emit a recognition if the label has been held
//!
//! Failures end the cycle, are reported as error events and leave the
//! pipeline usable for the next observation.

use std::path::Path;
use std::time::Instant;

use parking_lot::Mutex;
use signa_classify::{
    ClassifierSession, InputShape, LabelManifest, ModelLoader, PredictionStabilizer, StableLabel,
    Verdict,
};
use signa_core::{FrameClock, FrameTime, Observation, SignaError, SignaResult};
use signa_features::{BoneRotationSolver, FeatureExtractor};
use signa_window::{Resampler, WindowBuffer};

use crate::{emit, EventSender, PipelineConfig, PipelineEvent, PipelineStats, Recognition};

/// What one cycle did
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// No open session; observation ignored
    Dropped,
    /// Window has no full span yet
    Filling,
    /// Window was mostly empty and everything was reset
    EmptyWindow,
    /// Classified; the stabilizer's verdict
    Classified(Verdict),
    /// The cycle failed and an error event was sent
    Failed(SignaError),
}

struct PipelineInner {
    session: Option<ClassifierSession>,
    extractor: FeatureExtractor,
    window: WindowBuffer,
    resampler: Resampler,
    stabilizer: PredictionStabilizer,
    stats: PipelineStats,
}

impl PipelineInner {
    /// Forget all cross-cycle state
    fn reset(&mut self) {
        self.window.clear();
        self.stabilizer.reset();
        self.extractor.reset();
    }

    fn run_cycle(&mut self, observation: &Observation) -> SignaResult<CycleOutcome> {
        let features = self.extractor.extract(observation)?;

        let status = self.window.push(features, observation.timestamp)?;
        if !status.is_ready() {
            return Ok(CycleOutcome::Filling);
        }
        self.stats.windows_evaluated += 1;

        if self.window.mostly_empty() {
            tracing::debug!(
                timestamp = observation.timestamp.as_millis(),
                frames = self.window.len(),
                "window mostly empty, resetting"
            );
            self.reset();
            self.stats.empty_gate_trips += 1;
            return Ok(CycleOutcome::EmptyWindow);
        }

        let input = self.resampler.resample(&self.window)?;
        let session = self.session.as_mut().ok_or(SignaError::SessionClosed)?;
        let classification = session.classify(&input)?;
        self.stats.classifications += 1;

        let verdict = self.stabilizer.observe(
            &classification.label,
            classification.score,
            observation.timestamp,
        );
        Ok(CycleOutcome::Classified(verdict))
    }
}

/// Serialized extractor, window, classifier and stabilizer
pub struct GesturePipeline {
    inner: Mutex<PipelineInner>,
    events: EventSender,
    clock: FrameClock,
    config: PipelineConfig,
}

impl GesturePipeline {
    /// Create a closed pipeline; call `setup` before feeding observations
    pub fn new(
        config: PipelineConfig,
        solver: Box<dyn BoneRotationSolver>,
        events: EventSender,
        clock: FrameClock,
    ) -> SignaResult<Self> {
        config.validate()?;
        let inner = PipelineInner {
            session: None,
            extractor: FeatureExtractor::new(solver),
            window: WindowBuffer::new(config.window.clone()),
            resampler: Resampler::new(config.num_frames),
            stabilizer: PredictionStabilizer::new(config.stabilizer.clone()),
            stats: PipelineStats::default(),
        };
        Ok(Self {
            inner: Mutex::new(inner),
            events,
            clock,
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Open the classifier session
    ///
    /// Checks the feature width once with a dry extraction and loads the
    /// model for `[num_frames x width]` inputs. A no-op if already open.
    /// Failures are sent as an error event and returned; the pipeline stays
    /// closed and `setup` may be retried.
    pub fn setup(&self, loader: &dyn ModelLoader, labels: LabelManifest) -> SignaResult<()> {
        let mut inner = self.inner.lock();
        if inner.session.is_some() {
            return Ok(());
        }

        let opened = inner.extractor.verify().and_then(|width| {
            let shape = InputShape::new(self.config.num_frames, width);
            ClassifierSession::open(loader, labels, shape, self.config.use_hw_acceleration)
        });
        let session = match opened {
            Ok(session) => session,
            Err(e) => {
                tracing::error!(error = %e, "pipeline setup failed");
                emit(&self.events, PipelineEvent::error(e.to_string()));
                return Err(e);
            }
        };

        if let Some(fallback) = session.fallback() {
            emit(&self.events, PipelineEvent::error(fallback.to_string()));
        }

        tracing::info!(
            labels = session.labels().len(),
            delegate = %session.delegate(),
            "pipeline ready"
        );
        inner.reset();
        inner.session = Some(session);
        Ok(())
    }

    /// Load the label manifest from a file, then `setup`
    pub fn setup_from_manifest(
        &self,
        loader: &dyn ModelLoader,
        manifest: impl AsRef<Path>,
    ) -> SignaResult<()> {
        match LabelManifest::from_json_file(manifest) {
            Ok(labels) => self.setup(loader, labels),
            Err(e) => {
                tracing::error!(error = %e, "label manifest unavailable");
                emit(&self.events, PipelineEvent::error(e.to_string()));
                Err(e)
            }
        }
    }

    /// Close the session and forget all state
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        if let Some(session) = inner.session.take() {
            session.close();
        }
        inner.reset();
        tracing::info!("pipeline cleared");
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().session.is_none()
    }

    /// Run one cycle for an observation
    pub fn add_observation(&self, observation: &Observation) -> CycleOutcome {
        let started = Instant::now();
        let started_at = self.clock.now();

        let mut inner = self.inner.lock();
        if inner.session.is_none() {
            inner.stats.dropped_while_closed += 1;
            tracing::trace!(
                timestamp = observation.timestamp.as_millis(),
                "observation dropped, pipeline closed"
            );
            return CycleOutcome::Dropped;
        }
        inner.stats.cycles += 1;

        let outcome = match inner.run_cycle(observation) {
            Ok(outcome) => outcome,
            Err(e) => {
                inner.stats.errors += 1;
                tracing::error!(
                    error = %e,
                    timestamp = observation.timestamp.as_millis(),
                    "pipeline cycle failed"
                );
                emit(&self.events, PipelineEvent::error(e.to_string()));
                CycleOutcome::Failed(e)
            }
        };

        if let CycleOutcome::Classified(Verdict::Stable(stable)) = &outcome {
            inner.stats.emissions += 1;
            let recognition = recognition(stable, started_at, started);
            tracing::info!(
                label = %recognition.label,
                score = recognition.score,
                latency_ms = recognition.latency.as_millis() as u64,
                "gesture recognized"
            );
            emit(&self.events, PipelineEvent::Recognized(recognition));
        }

        inner.stats.last_cycle_duration = started.elapsed();
        outcome
    }

    /// Report a cycle that unwound instead of returning
    pub(crate) fn report_panic(&self, timestamp: FrameTime, message: &str) {
        let mut inner = self.inner.lock();
        inner.stats.errors += 1;
        tracing::error!(
            timestamp = timestamp.as_millis(),
            panic = message,
            "pipeline cycle panicked"
        );
        emit(
            &self.events,
            PipelineEvent::error(format!("pipeline cycle panicked: {message}")),
        );
    }

    pub fn stats(&self) -> PipelineStats {
        self.inner.lock().stats.clone()
    }

    /// Frames currently in the window
    pub fn window_len(&self) -> usize {
        self.inner.lock().window.len()
    }

    /// True if window, stabilizer and extractor hold no state
    pub fn is_reset(&self) -> bool {
        let inner = self.inner.lock();
        inner.window.is_empty()
            && inner.stabilizer.state().is_none()
            && inner.extractor.state().is_reset()
    }
}

impl std::fmt::Debug for GesturePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GesturePipeline")
            .field("config", &self.config)
            .field("closed", &self.inner.try_lock().map(|i| i.session.is_none()))
            .finish_non_exhaustive()
    }
}

fn recognition(stable: &StableLabel, started_at: FrameTime, started: Instant) -> Recognition {
    Recognition {
        label: stable.label.clone(),
        score: stable.score,
        frame_timestamp: stable.timestamp,
        candidate_since: stable.candidate_since,
        started_at,
        latency: started.elapsed(),
    }
}
