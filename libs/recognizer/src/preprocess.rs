//! Canvas pixels to model input
//!
//! The transform is fixed: box-average down to 28x28, grayscale as the plain
//! mean of R, G and B, then standardize with the MNIST training statistics.
//! The model only sees values produced this way, so none of it is
//! configurable.

use serde::Serialize;

use crate::surface::{CanvasSurface, DrawingSurface};
use crate::RecognizerError;

/// Side length of the model input image
pub const DIGIT_SIZE: usize = 28;

/// Mean of the training set pixel intensities (scaled to 0..1)
pub const MNIST_MEAN: f32 = 0.1307;

/// Standard deviation of the training set pixel intensities (scaled to 0..1)
pub const MNIST_STD: f32 = 0.3081;

/// Normalized 28x28 image laid out as a (1, 1, 28, 28) tensor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputTensor {
    data: Vec<f32>,
}

impl InputTensor {
    /// Name of the model input this tensor feeds
    pub const NAME: &'static str = "input";

    /// Batch, channel, height, width
    pub const SHAPE: [usize; 4] = [1, 1, DIGIT_SIZE, DIGIT_SIZE];

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at (row, col) of the 28x28 image
    pub fn at(&self, row: usize, col: usize) -> f32 {
        self.data[row * DIGIT_SIZE + col]
    }
}

/// Box-average an RGBA buffer down to 28x28 grayscale intensities in 0..=255
pub fn downsample(rgba: &[u8], width: u32, height: u32) -> Result<Vec<f32>, RecognizerError> {
    let (w, h) = (width as usize, height as usize);
    if w == 0 || h == 0 {
        return Err(RecognizerError::InvalidSurface(format!(
            "dimensions must be non-zero, got {}x{}",
            width, height
        )));
    }
    if rgba.len() != w * h * 4 {
        return Err(RecognizerError::InvalidSurface(format!(
            "expected {} bytes for {}x{}, got {}",
            w * h * 4,
            width,
            height,
            rgba.len()
        )));
    }

    let mut gray = Vec::with_capacity(DIGIT_SIZE * DIGIT_SIZE);
    for oy in 0..DIGIT_SIZE {
        let (y0, y1) = source_span(oy, h);
        for ox in 0..DIGIT_SIZE {
            let (x0, x1) = source_span(ox, w);

            // Integer sums keep the average exact and order-independent
            let mut sum: u64 = 0;
            for y in y0..y1 {
                let row = &rgba[(y * w + x0) * 4..(y * w + x1) * 4];
                for px in row.chunks_exact(4) {
                    sum += px[0] as u64 + px[1] as u64 + px[2] as u64;
                }
            }
            let count = ((y1 - y0) * (x1 - x0) * 3) as u64;
            gray.push(sum as f32 / count as f32);
        }
    }

    Ok(gray)
}

/// Standardize one grayscale intensity (0..=255)
pub fn normalize(gray: f32) -> f32 {
    (gray / 255.0 - MNIST_MEAN) / MNIST_STD
}

/// Full transform from an RGBA buffer to the model input
pub fn preprocess(rgba: &[u8], width: u32, height: u32) -> Result<InputTensor, RecognizerError> {
    let data = downsample(rgba, width, height)?
        .into_iter()
        .map(normalize)
        .collect();
    Ok(InputTensor { data })
}

impl CanvasSurface {
    pub fn to_input_tensor(&self) -> Result<InputTensor, RecognizerError> {
        preprocess(self.rgba(), self.width(), self.height())
    }
}

/// Source pixel range [start, end) covered by output index `i`
fn source_span(i: usize, source_len: usize) -> (usize, usize) {
    let start = i * source_len / DIGIT_SIZE;
    let end = ((i + 1) * source_len / DIGIT_SIZE).max(start + 1);
    (start, end)
}
