//! Pending-pair table
//!
//! Holds the first detector half for each frame timestamp until its partner
//! arrives. The only mutation is `insert_or_take`, which either stores a half
//! or removes and returns the completed pair under one lock acquisition, so two
//! detector threads racing on the same timestamp can neither both store nor
//! both complete.

use std::collections::HashMap;

use parking_lot::Mutex;

use signa_core::{FrameMeta, FrameTime, HandResult, PoseResult};

/// One detector's contribution for a frame
#[derive(Debug, Clone, PartialEq)]
pub enum DetectorHalf {
    Hand(HandResult),
    Pose(PoseResult),
}

impl DetectorHalf {
    fn kind(&self) -> &'static str {
        match self {
            DetectorHalf::Hand(_) => "hand",
            DetectorHalf::Pose(_) => "pose",
        }
    }
}

/// Both halves for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedPair {
    pub meta: FrameMeta,
    pub hand: HandResult,
    pub pose: PoseResult,
}

/// Outcome of offering a half to the table
#[derive(Debug, Clone, PartialEq)]
pub enum Merge {
    /// First half for this timestamp; stored until its partner arrives
    Stored,
    /// Second half arrived; the entry was removed from the table
    Complete(CompletedPair),
    /// The table is closed; the half was discarded
    Closed,
}

#[derive(Debug)]
struct PendingPair {
    meta: FrameMeta,
    half: DetectorHalf,
}

#[derive(Debug)]
struct PendingState {
    open: bool,
    pairs: HashMap<FrameTime, PendingPair>,
}

/// Thread-safe pending-pair table keyed by frame timestamp
#[derive(Debug)]
pub struct PendingPairs {
    state: Mutex<PendingState>,
}

impl PendingPairs {
    /// Create an open, empty table
    pub fn new() -> Self {
        Self {
            state: Mutex::new(PendingState {
                open: true,
                pairs: HashMap::new(),
            }),
        }
    }

    /// Store `half` for `meta.timestamp`, or complete and remove the pair
    pub fn insert_or_take(&self, meta: FrameMeta, half: DetectorHalf) -> Merge {
        let mut state = self.state.lock();
        if !state.open {
            return Merge::Closed;
        }

        let Some(existing) = state.pairs.remove(&meta.timestamp) else {
            state.pairs.insert(meta.timestamp, PendingPair { meta, half });
            return Merge::Stored;
        };

        match (existing.half, half) {
            (DetectorHalf::Hand(hand), DetectorHalf::Pose(pose))
            | (DetectorHalf::Pose(pose), DetectorHalf::Hand(hand)) => {
                Merge::Complete(CompletedPair {
                    meta: existing.meta,
                    hand,
                    pose,
                })
            }
            (_, repeated) => {
                tracing::warn!(
                    timestamp = meta.timestamp.as_millis(),
                    kind = repeated.kind(),
                    "duplicate detector result, keeping the latest"
                );
                state.pairs.insert(
                    meta.timestamp,
                    PendingPair {
                        meta,
                        half: repeated,
                    },
                );
                Merge::Stored
            }
        }
    }

    /// Accept halves again after a close
    pub fn open(&self) {
        self.state.lock().open = true;
    }

    /// Discard all pending halves and reject new ones
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.open = false;
        state.pairs.clear();
    }

    pub fn is_open(&self) -> bool {
        self.state.lock().open
    }

    /// Number of timestamps waiting for their second half
    pub fn len(&self) -> usize {
        self.state.lock().pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PendingPairs {
    fn default() -> Self {
        Self::new()
    }
}
