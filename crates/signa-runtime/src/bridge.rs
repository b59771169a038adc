//! Detector bridge - camera frames in, fused observations out
//!
//! The hand and pose detectors run asynchronously and call back on their own
//! threads. The bridge pairs their results through a `LandmarkCorrelator` and
//! forwards every completed observation to the pipeline worker queue.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use signa_classify::{load_with_fallback, Delegate};
use signa_core::{
    FrameClock, FrameMeta, FrameTime, HandResult, PoseResult, SignaError, SignaResult,
};
use signa_correlate::LandmarkCorrelator;

use crate::{emit, EventSender, ObservationSender, PipelineEvent};

/// Pixels copied out of a camera frame
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Arc<[u8]>,
}

/// A camera buffer; dropping it releases the buffer
pub trait CameraFrame: Send {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Copy the pixels into detector-owned memory
    fn copy_pixels(&self) -> Vec<u8>;
}

/// Delivers a hand result for a frame
pub type HandCallback = Arc<dyn Fn(HandResult, FrameMeta) + Send + Sync>;
/// Delivers a pose result for a frame
pub type PoseCallback = Arc<dyn Fn(PoseResult, FrameMeta) + Send + Sync>;
/// Delivers an asynchronous detector failure
pub type ErrorCallback = Arc<dyn Fn(String) + Send + Sync>;

/// A running landmark detector
pub trait LandmarkDetector: Send + Sync {
    /// Start detection; the result arrives later through the callback
    fn detect_async(&self, image: &DetectorImage, meta: FrameMeta) -> SignaResult<()>;

    /// Release resources synchronously
    fn close(&self);
}

/// Creates the hand and pose detectors
pub trait DetectorLoader: Send + Sync {
    fn load_hand(
        &self,
        delegate: Delegate,
        on_result: HandCallback,
        on_error: ErrorCallback,
    ) -> SignaResult<Box<dyn LandmarkDetector>>;

    fn load_pose(
        &self,
        delegate: Delegate,
        on_result: PoseCallback,
        on_error: ErrorCallback,
    ) -> SignaResult<Box<dyn LandmarkDetector>>;
}

struct Detectors {
    hand: Box<dyn LandmarkDetector>,
    pose: Box<dyn LandmarkDetector>,
}

impl Detectors {
    fn close(self) {
        self.hand.close();
        self.pose.close();
    }
}

/// Owns the detectors and the correlator
pub struct DetectorBridge {
    loader: Arc<dyn DetectorLoader>,
    detectors: RwLock<Option<Detectors>>,
    correlator: Arc<LandmarkCorrelator>,
    observations: ObservationSender,
    events: EventSender,
    clock: FrameClock,
    /// Last timestamp handed to the detectors, in milliseconds
    last_timestamp: AtomicI64,
    use_acceleration: bool,
}

impl DetectorBridge {
    pub fn new(
        loader: Arc<dyn DetectorLoader>,
        observations: ObservationSender,
        events: EventSender,
        clock: FrameClock,
        use_acceleration: bool,
    ) -> Self {
        let correlator = Arc::new(LandmarkCorrelator::new(clock));
        // Nothing is accepted until setup succeeds
        correlator.close();
        Self {
            loader,
            detectors: RwLock::new(None),
            correlator,
            observations,
            events,
            clock,
            last_timestamp: AtomicI64::new(i64::MIN),
            use_acceleration,
        }
    }

    /// Load both detectors; a no-op if already open
    ///
    /// An accelerated-delegate failure is reported as an error event and
    /// retried on CPU. Any other failure is reported, returned, and leaves
    /// the bridge closed.
    pub fn setup(&self) -> SignaResult<()> {
        let mut detectors = self.detectors.write();
        if detectors.is_some() {
            return Ok(());
        }

        let on_error = self.error_callback();
        let hand = load_with_fallback("hand detector", self.use_acceleration, |delegate| {
            self.loader
                .load_hand(delegate, self.hand_callback(), Arc::clone(&on_error))
        });
        let hand = match hand {
            Ok(loaded) => {
                self.report_fallback(loaded.fallback.as_ref());
                loaded.value
            }
            Err(e) => return Err(self.setup_failed(e)),
        };

        let pose = load_with_fallback("pose detector", self.use_acceleration, |delegate| {
            self.loader
                .load_pose(delegate, self.pose_callback(), Arc::clone(&on_error))
        });
        let pose = match pose {
            Ok(loaded) => {
                self.report_fallback(loaded.fallback.as_ref());
                loaded.value
            }
            Err(e) => {
                hand.close();
                return Err(self.setup_failed(e));
            }
        };

        self.correlator.open();
        *detectors = Some(Detectors { hand, pose });
        tracing::info!("detectors ready");
        Ok(())
    }

    fn setup_failed(&self, e: SignaError) -> SignaError {
        tracing::error!(error = %e, "detector setup failed");
        emit(&self.events, PipelineEvent::error(e.to_string()));
        e
    }

    fn report_fallback(&self, fallback: Option<&SignaError>) {
        if let Some(fallback) = fallback {
            emit(&self.events, PipelineEvent::error(fallback.to_string()));
        }
    }

    fn hand_callback(&self) -> HandCallback {
        let correlator = Arc::clone(&self.correlator);
        let observations = self.observations.clone();
        Arc::new(move |result, meta| {
            if let Some(observation) = correlator.on_hand_result(result, meta) {
                if observations.send(observation).is_err() {
                    tracing::trace!("pipeline worker gone, observation dropped");
                }
            }
        })
    }

    fn pose_callback(&self) -> PoseCallback {
        let correlator = Arc::clone(&self.correlator);
        let observations = self.observations.clone();
        Arc::new(move |result, meta| {
            if let Some(observation) = correlator.on_pose_result(result, meta) {
                if observations.send(observation).is_err() {
                    tracing::trace!("pipeline worker gone, observation dropped");
                }
            }
        })
    }

    fn error_callback(&self) -> ErrorCallback {
        let events = self.events.clone();
        Arc::new(move |message| {
            tracing::warn!(%message, "detector error");
            emit(&events, PipelineEvent::error(message));
        })
    }

    /// Submit a camera frame to both detectors
    ///
    /// The frame is released as soon as its pixels are copied, or right away
    /// when the bridge is closed. Returns the timestamp it was submitted
    /// under; timestamps are strictly increasing across calls.
    pub fn recognize<F: CameraFrame>(&self, frame: F) -> Option<FrameTime> {
        let detectors = self.detectors.read();
        let Some(detectors) = detectors.as_ref() else {
            drop(frame);
            tracing::trace!("frame dropped, detectors closed");
            return None;
        };

        let timestamp = self.next_timestamp();
        let image = DetectorImage {
            width: frame.width(),
            height: frame.height(),
            pixels: frame.copy_pixels().into(),
        };
        drop(frame);

        let meta = FrameMeta::new(timestamp, image.width, image.height);
        for (name, detector) in [("hand", &detectors.hand), ("pose", &detectors.pose)] {
            if let Err(e) = detector.detect_async(&image, meta) {
                tracing::warn!(detector = name, error = %e, "detection not started");
                emit(&self.events, PipelineEvent::error(e.to_string()));
            }
        }
        Some(timestamp)
    }

    /// Clock time, bumped past the last issued timestamp when frames arrive
    /// within the same millisecond
    fn next_timestamp(&self) -> FrameTime {
        let now = self.clock.now().as_millis();
        let next = |last: i64| now.max(last.saturating_add(1));
        let last = self
            .last_timestamp
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| Some(next(last)))
            .unwrap_or_else(|last| last);
        FrameTime::from_millis(next(last))
    }

    /// Close both detectors and drop pending halves
    pub fn close(&self) {
        let detectors = self.detectors.write().take();
        self.correlator.close();
        if let Some(detectors) = detectors {
            detectors.close();
            tracing::info!("detectors closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.detectors.read().is_none()
    }

    /// Frame halves still waiting for their counterpart
    pub fn pending_pairs(&self) -> usize {
        self.correlator.pending_len()
    }
}

impl Drop for DetectorBridge {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for DetectorBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetectorBridge")
            .field("use_acceleration", &self.use_acceleration)
            .field("pending_pairs", &self.correlator.pending_len())
            .finish_non_exhaustive()
    }
}
