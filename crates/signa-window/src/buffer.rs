//! Rolling feature window with span eviction and emptiness gate

use std::collections::VecDeque;
use std::ops::Range;
use std::time::Duration;

use signa_core::{FrameTime, SignaError, SignaResult};
use signa_features::{FeatureLayout, FeatureVector};

/// Window configuration
#[derive(Clone, Debug, PartialEq)]
pub struct WindowConfig {
    /// Span that makes a window ready for evaluation
    pub span: Duration,
    /// Fraction of empty frames above which the window is discarded
    pub mostly_empty_ratio: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            span: Duration::from_millis(1000),
            mostly_empty_ratio: 0.7,
        }
    }
}

/// Outcome of appending one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowStatus {
    /// No full span yet; nothing to evaluate this frame
    Filling,
    /// A full span was reached and the head was trimmed
    Ready { evicted: usize },
}

impl WindowStatus {
    pub fn is_ready(self) -> bool {
        matches!(self, WindowStatus::Ready { .. })
    }
}

/// Ordered (feature vector, timestamp) pairs
#[derive(Debug)]
pub struct WindowBuffer {
    entries: VecDeque<(FeatureVector, FrameTime)>,
    gate_block: Range<usize>,
    config: WindowConfig,
}

impl WindowBuffer {
    pub fn new(config: WindowConfig) -> Self {
        Self {
            entries: VecDeque::new(),
            gate_block: FeatureLayout::emptiness_block(),
            config,
        }
    }

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    /// Append a frame at the tail
    ///
    /// Timestamps must not decrease. Eviction only runs once the span from
    /// head to tail reaches the configured span; it then drops head entries
    /// until the span is shorter or a single entry remains.
    pub fn push(
        &mut self,
        features: FeatureVector,
        timestamp: FrameTime,
    ) -> SignaResult<WindowStatus> {
        if let Some(tail) = self.tail() {
            if timestamp < tail {
                return Err(SignaError::NonMonotonicFrame { timestamp, tail });
            }
        }
        self.entries.push_back((features, timestamp));

        if self.span() < self.config.span {
            return Ok(WindowStatus::Filling);
        }

        let mut evicted = 0;
        while self.entries.len() > 1 && self.span() >= self.config.span {
            self.entries.pop_front();
            evicted += 1;
        }
        tracing::trace!(
            evicted,
            len = self.entries.len(),
            span_ms = self.span().as_millis() as u64,
            "window ready"
        );
        Ok(WindowStatus::Ready { evicted })
    }

    /// Time from head to tail
    pub fn span(&self) -> Duration {
        match (self.head(), self.tail()) {
            (Some(head), Some(tail)) => tail - head,
            _ => Duration::ZERO,
        }
    }

    pub fn head(&self) -> Option<FrameTime> {
        self.entries.front().map(|(_, t)| *t)
    }

    pub fn tail(&self) -> Option<FrameTime> {
        self.entries.back().map(|(_, t)| *t)
    }

    /// Fraction of frames whose gated hand block is all zero
    pub fn empty_fraction(&self) -> f32 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let empty = self
            .entries
            .iter()
            .filter(|(features, _)| {
                features
                    .as_slice()
                    .get(self.gate_block.clone())
                    .map_or(true, |block| block.iter().all(|v| *v == 0.0))
            })
            .count();
        empty as f32 / self.entries.len() as f32
    }

    /// True if the window carries no gesture content
    pub fn mostly_empty(&self) -> bool {
        self.empty_fraction() > self.config.mostly_empty_ratio
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.entries.iter().map(|(features, _)| features.as_slice())
    }

    pub fn row(&self, index: usize) -> Option<&[f32]> {
        self.entries.get(index).map(|(features, _)| features.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for WindowBuffer {
    fn default() -> Self {
        Self::new(WindowConfig::default())
    }
}
