//! Prediction stabilizer - confidence threshold plus minimum-hold debounce
//!
//! States: idle, or a candidate `(label, since)`. A confident classification
//! with a new label replaces the candidate. A confident classification that
//! repeats the candidate emits once it has been held for `min_unchanged`.
//! Emission does not reset the candidate, so every later qualifying cycle
//! emits again; collapsing the repeats is up to the consumer.

use std::time::Duration;

use signa_core::FrameTime;

/// Stabilizer configuration
#[derive(Clone, Debug, PartialEq)]
pub struct StabilizerConfig {
    /// Minimum score for a classification to count
    pub threshold: f32,
    /// Hold time before a candidate is emitted
    pub min_unchanged: Duration,
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        StabilizerConfig {
            threshold: 0.9,
            min_unchanged: Duration::from_millis(600),
        }
    }
}

/// Current candidate label and when it was first seen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionState {
    pub label: String,
    pub since: FrameTime,
}

/// A label held long enough to be reported
#[derive(Debug, Clone, PartialEq)]
pub struct StableLabel {
    pub label: String,
    pub score: f32,
    pub timestamp: FrameTime,
    pub candidate_since: FrameTime,
}

/// Result of one stabilizer step
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Score below threshold
    Ignored,
    /// New candidate recorded
    Candidate,
    /// Same candidate, not held long enough yet
    Holding { held: Duration },
    Stable(StableLabel),
}

impl Verdict {
    pub fn into_stable(self) -> Option<StableLabel> {
        match self {
            Verdict::Stable(stable) => Some(stable),
            _ => None,
        }
    }
}

/// Debounces per-cycle classifications
#[derive(Debug, Default)]
pub struct PredictionStabilizer {
    config: StabilizerConfig,
    state: Option<PredictionState>,
}

impl PredictionStabilizer {
    pub fn new(config: StabilizerConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }

    pub fn config(&self) -> &StabilizerConfig {
        &self.config
    }

    pub fn state(&self) -> Option<&PredictionState> {
        self.state.as_ref()
    }

    /// Feed one classification cycle
    pub fn observe(&mut self, label: &str, score: f32, timestamp: FrameTime) -> Verdict {
        if score.is_nan() || score < self.config.threshold {
            return Verdict::Ignored;
        }

        match &self.state {
            Some(state) if state.label == label => {
                let held = timestamp - state.since;
                if held >= self.config.min_unchanged {
                    Verdict::Stable(StableLabel {
                        label: label.to_string(),
                        score,
                        timestamp,
                        candidate_since: state.since,
                    })
                } else {
                    Verdict::Holding { held }
                }
            }
            _ => {
                tracing::debug!(label, timestamp = timestamp.as_millis(), "new candidate");
                self.state = Some(PredictionState {
                    label: label.to_string(),
                    since: timestamp,
                });
                Verdict::Candidate
            }
        }
    }

    pub fn reset(&mut self) {
        self.state = None;
    }
}
