use crate::config::{DEFAULT_INPUT_SIZE, PIXEL_SCALE};
use crate::{CanonicalImage, FeatureTensor};
use common::span;
use image::{RgbImage, imageops::FilterType};
use ndarray::Array4;

/// Stretches an image to the model input size and scales it to [0, 1].
///
/// Stateless, so a single instance can be shared between concurrent requests.
#[derive(Debug, Clone, Copy)]
pub struct CpuPreProcessor {
    pub input_size: (u32, u32),
}

impl CpuPreProcessor {
    pub fn new(input_size: (u32, u32)) -> Self {
        Self { input_size }
    }

    /// Produce a `(1, height, width, 3)` tensor from a decoded image.
    pub fn preprocess(&self, image: &CanonicalImage) -> FeatureTensor {
        let _s = span!("preprocess");

        let (width, height) = image.dimensions();
        tracing::trace!(
            width,
            height,
            target_width = self.input_size.0,
            target_height = self.input_size.1,
            "Preprocessing image dimensions"
        );

        let resized = self.resize(image.as_rgb());
        Self::normalize(&resized)
    }

    fn resize(&self, image: &RgbImage) -> RgbImage {
        let _s = span!("resize");

        let (width, height) = self.input_size;
        if image.dimensions() == (width, height) {
            return image.clone();
        }

        // Stretch to fit: no aspect-ratio preservation, no letterboxing.
        image::imageops::resize(image, width, height, FilterType::Triangle)
    }

    fn normalize(image: &RgbImage) -> FeatureTensor {
        let _s = span!("normalize");

        let width = image.width() as usize;
        let height = image.height() as usize;
        let raw = image.as_raw();

        let input = Array4::from_shape_fn((1, height, width, 3), |(_, y, x, c)| {
            raw[(y * width + x) * 3 + c] as f32 / PIXEL_SCALE
        });

        FeatureTensor::from(input)
    }
}

impl Default for CpuPreProcessor {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_SIZE)
    }
}
