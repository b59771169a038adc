//! Resampler - fixed-length classifier input from a variable-length window

use signa_core::{InputTensor, SignaError, SignaResult};

use crate::WindowBuffer;

/// Rows fed to the classifier per evaluation
pub const NUM_FRAMES: usize = 15;

/// Evenly spaced indices covering `0..=len-1`
///
/// The first index is always 0 and the last is always `len - 1`; the others
/// are the nearest integers on the line between them, with halves rounded up.
/// Integer arithmetic only, so the result is exact for every input.
pub fn linspace_indices(len: usize, count: usize) -> Vec<usize> {
    if len == 0 || count == 0 {
        return Vec::new();
    }
    if count == 1 {
        return vec![0];
    }

    let last = len - 1;
    let steps = count - 1;
    (0..count)
        .map(|i| (2 * i * last + steps) / (2 * steps))
        .collect()
}

/// Picks `num_frames` rows from a window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resampler {
    num_frames: usize,
}

impl Resampler {
    pub fn new(num_frames: usize) -> Self {
        Self { num_frames }
    }

    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    pub fn indices(&self, len: usize) -> Vec<usize> {
        linspace_indices(len, self.num_frames)
    }

    /// Build the `[num_frames x width]` tensor for the current window
    ///
    /// Windows shorter than `num_frames` repeat rows.
    pub fn resample(&self, window: &WindowBuffer) -> SignaResult<InputTensor> {
        let width = window.row(0).map(<[f32]>::len).ok_or(SignaError::EmptyWindow)?;

        let rows = self
            .indices(window.len())
            .into_iter()
            .filter_map(|i| window.row(i));

        InputTensor::from_rows(rows, width)
            .filter(|tensor| tensor.frames() == self.num_frames)
            .ok_or(SignaError::TensorShape {
                expected_frames: self.num_frames,
                expected_width: width,
                frames: window.len(),
                width,
            })
    }
}

impl Default for Resampler {
    fn default() -> Self {
        Self::new(NUM_FRAMES)
    }
}
