//! Classifier input tensor

/// Row-major `[frames x width]` tensor fed to the gesture model
#[derive(Debug, Clone, PartialEq)]
pub struct InputTensor {
    frames: usize,
    width: usize,
    data: Vec<f32>,
}

impl InputTensor {
    /// Build from rows; every row must have `width` elements
    pub fn from_rows<'a, I>(rows: I, width: usize) -> Option<Self>
    where
        I: IntoIterator<Item = &'a [f32]>,
    {
        let mut data = Vec::new();
        let mut frames = 0;
        for row in rows {
            if row.len() != width {
                return None;
            }
            data.extend_from_slice(row);
            frames += 1;
        }
        Some(Self {
            frames,
            width,
            data,
        })
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn row(&self, index: usize) -> Option<&[f32]> {
        if index >= self.frames {
            return None;
        }
        let start = index * self.width;
        Some(&self.data[start..start + self.width])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks(self.width.max(1)).take(self.frames)
    }

    /// Flat row-major view
    pub fn as_flat(&self) -> &[f32] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tensor_from_rows() {
        let a = [1.0, 2.0];
        let b = [3.0, 4.0];
        let tensor = InputTensor::from_rows([&a[..], &b[..]], 2).unwrap();

        assert_eq!(tensor.frames(), 2);
        assert_eq!(tensor.width(), 2);
        assert_eq!(tensor.row(1), Some(&[3.0, 4.0][..]));
        assert_eq!(tensor.as_flat(), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(tensor.rows().count(), 2);
    }

    #[test]
    fn test_tensor_rejects_ragged_rows() {
        let a = [1.0, 2.0];
        let b = [3.0];
        assert!(InputTensor::from_rows([&a[..], &b[..]], 2).is_none());
    }
}
