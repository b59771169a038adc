//! Keep-only-latest frame slot
//!
//! Camera frames are never queued. A frame offered while an older one is
//! still waiting replaces it and the older one is dropped (released).

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

#[derive(Debug)]
struct Slot<F> {
    frame: Option<F>,
    dropped: u64,
    closed: bool,
}

/// Single-frame handoff between camera and detector driver
#[derive(Debug)]
pub struct LatestFrameSlot<F> {
    slot: Mutex<Slot<F>>,
    ready: Condvar,
}

impl<F> LatestFrameSlot<F> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Slot {
                frame: None,
                dropped: 0,
                closed: false,
            }),
            ready: Condvar::new(),
        }
    }

    /// Store a frame, dropping any frame not yet taken
    ///
    /// Returns false (and drops the frame) once the slot is closed.
    pub fn offer(&self, frame: F) -> bool {
        let stale = {
            let mut slot = self.slot.lock();
            if slot.closed {
                return false;
            }
            let stale = slot.frame.replace(frame);
            if stale.is_some() {
                slot.dropped += 1;
            }
            stale
        };
        // Release the replaced frame outside the lock
        drop(stale);
        self.ready.notify_one();
        true
    }

    /// Take the waiting frame, if any
    pub fn take(&self) -> Option<F> {
        self.slot.lock().frame.take()
    }

    /// Wait up to `timeout` for a frame
    ///
    /// Returns `None` on timeout or when the slot is closed and empty.
    pub fn take_timeout(&self, timeout: Duration) -> Option<F> {
        let deadline = Instant::now() + timeout;
        let mut slot = self.slot.lock();
        while slot.frame.is_none() && !slot.closed {
            if self.ready.wait_until(&mut slot, deadline).timed_out() {
                break;
            }
        }
        slot.frame.take()
    }

    /// Frames replaced before they were taken
    pub fn dropped(&self) -> u64 {
        self.slot.lock().dropped
    }

    /// Drop any waiting frame and refuse new ones
    pub fn close(&self) {
        let stale = {
            let mut slot = self.slot.lock();
            slot.closed = true;
            slot.frame.take()
        };
        drop(stale);
        self.ready.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.slot.lock().closed
    }
}

impl<F> Default for LatestFrameSlot<F> {
    fn default() -> Self {
        Self::new()
    }
}
