//! Stack geometry and the decoded volume

use std::fmt;

use crate::tiff::errors::{TiffError, TiffResult};

/// Shape of a volume as (slices, rows, cols)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub slices: usize,
    pub rows: usize,
    pub cols: usize,
}

impl Shape {
    /// Creates a shape, clamping zero rows or cols to 1
    pub fn new(slices: usize, rows: usize, cols: usize) -> Self {
        Shape {
            slices,
            rows: rows.max(1),
            cols: cols.max(1),
        }
    }

    /// Number of samples in one slice
    pub fn slice_len(&self) -> usize {
        self.rows * self.cols
    }

    /// Number of samples in the whole volume
    pub fn volume(&self) -> TiffResult<usize> {
        self.rows.checked_mul(self.cols)
            .and_then(|n| n.checked_mul(self.slices))
            .ok_or_else(|| TiffError::AllocationError(format!(
                "volume {} overflows the address space", self)))
    }

    /// Returns the shape as a tuple
    pub fn as_tuple(&self) -> (usize, usize, usize) {
        (self.slices, self.rows, self.cols)
    }
}

impl From<(usize, usize, usize)> for Shape {
    fn from((slices, rows, cols): (usize, usize, usize)) -> Self {
        Shape { slices, rows, cols }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.slices, self.rows, self.cols)
    }
}

/// A decoded stack: float32 samples laid out as [slices, rows, cols]
#[derive(Debug, Clone, PartialEq)]
pub struct ImageStack {
    shape: Shape,
    samples: Vec<f32>,
}

impl ImageStack {
    pub(crate) fn new(shape: Shape, samples: Vec<f32>) -> Self {
        debug_assert_eq!(shape.volume().ok(), Some(samples.len()));
        ImageStack { shape, samples }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Row-major samples of one slice
    pub fn slice(&self, index: usize) -> Option<&[f32]> {
        if index >= self.shape.slices {
            return None;
        }
        let len = self.shape.slice_len();
        Some(&self.samples[index * len..(index + 1) * len])
    }

    /// Consumes the stack, returning its sample buffer
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_degenerate_dimensions() {
        let shape = Shape::new(2, 0, 5);
        assert_eq!(shape.as_tuple(), (2, 1, 5));
        assert_eq!(shape.volume().unwrap(), 10);
    }

    #[test]
    fn volume_overflow_is_an_allocation_error() {
        let shape = Shape::new(usize::MAX, 2, 2);
        assert!(matches!(shape.volume(), Err(TiffError::AllocationError(_))));
    }

    #[test]
    fn slices_are_row_major_blocks() {
        let stack = ImageStack::new(Shape::new(2, 1, 2), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(stack.slice(1), Some(&[3.0, 4.0][..]));
        assert_eq!(stack.slice(2), None);
    }
}
