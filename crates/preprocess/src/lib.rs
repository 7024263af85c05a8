pub mod config;
pub mod cpu;
pub mod decoder;

use image::RgbImage;
use ndarray::{Array4, ArrayView4};

pub use config::DEFAULT_INPUT_SIZE;
pub use cpu::CpuPreProcessor;
pub use decoder::{DecodeError, decode};

/// A decoded image with exactly three 8-bit channels (RGB, no alpha).
#[derive(Debug, Clone)]
pub struct CanonicalImage(RgbImage);

impl CanonicalImage {
    pub fn dimensions(&self) -> (u32, u32) {
        self.0.dimensions()
    }

    /// Row-major `width * height * 3` bytes.
    pub fn as_raw(&self) -> &[u8] {
        self.0.as_raw()
    }

    pub fn as_rgb(&self) -> &RgbImage {
        &self.0
    }
}

impl From<RgbImage> for CanonicalImage {
    fn from(image: RgbImage) -> Self {
        Self(image)
    }
}

/// Model input in NHWC layout, batch of one, values in [0.0, 1.0].
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTensor(Array4<f32>);

impl FeatureTensor {
    pub fn shape(&self) -> &[usize] {
        self.0.shape()
    }

    pub fn view(&self) -> ArrayView4<'_, f32> {
        self.0.view()
    }
}

impl From<Array4<f32>> for FeatureTensor {
    fn from(array: Array4<f32>) -> Self {
        Self(array)
    }
}
