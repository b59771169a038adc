//! Frame time primitives
//!
//! Every detector result, observation and window entry is stamped with the
//! submission time of the camera frame it came from, in milliseconds on a
//! monotonic clock. Both detectors receive the same value for the same frame,
//! which is what lets the correlator pair their results.

use std::ops::{Add, Sub};
use std::time::{Duration, Instant};

/// Frame timestamp in milliseconds
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FrameTime(pub i64);

impl FrameTime {
    pub const ZERO: FrameTime = FrameTime(0);

    #[inline]
    pub fn from_millis(millis: i64) -> Self {
        FrameTime(millis)
    }

    #[inline]
    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// Elapsed time since an earlier frame, saturating at zero
    #[inline]
    pub fn since(self, earlier: FrameTime) -> Duration {
        self - earlier
    }
}

impl Add<Duration> for FrameTime {
    type Output = FrameTime;

    #[inline]
    fn add(self, rhs: Duration) -> Self::Output {
        FrameTime(self.0.saturating_add(i64::try_from(rhs.as_millis()).unwrap_or(i64::MAX)))
    }
}

impl Sub<FrameTime> for FrameTime {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: FrameTime) -> Self::Output {
        let diff = self.0 - rhs.0;
        if diff >= 0 {
            Duration::from_millis(diff as u64)
        } else {
            Duration::ZERO
        }
    }
}

impl std::fmt::Debug for FrameTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "frame({}ms)", self.0)
    }
}

/// Monotonic millisecond clock that frame timestamps are read from
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    epoch: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }

    /// Current time relative to the clock's epoch
    pub fn now(&self) -> FrameTime {
        FrameTime(i64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(i64::MAX))
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
