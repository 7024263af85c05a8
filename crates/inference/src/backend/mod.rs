use crate::error::InferenceError;
use ndarray::ArrayViewD;
use preprocess::FeatureTensor;
use std::sync::Arc;

#[cfg(feature = "ort-backend")]
pub mod ort;

/// Probability of the defective class, in [0.0, 1.0].
pub type RawScore = f32;

/// A loaded binary classifier.
///
/// Implementations are shared by every in-flight request, so they must be
/// safe to call concurrently. Backends whose runtime needs exclusive access
/// serialize calls internally instead of relying on callers.
pub trait Classifier: Send + Sync {
    /// Run a single `(1, H, W, 3)` tensor through the model.
    fn infer(&self, tensor: &FeatureTensor) -> Result<RawScore, InferenceError>;
}

/// Process-wide, read-only reference to the loaded model.
pub type ClassifierHandle = Arc<dyn Classifier>;

/// Read the sigmoid score out of a batch-of-one model output.
pub fn score_from_output(output: ArrayViewD<'_, f32>) -> Result<RawScore, InferenceError> {
    let score = output
        .iter()
        .next()
        .copied()
        .ok_or_else(|| InferenceError::InvalidOutput("empty output tensor".to_string()))?;

    if !score.is_finite() {
        return Err(InferenceError::InvalidOutput(format!(
            "non-finite score {}",
            score
        )));
    }

    Ok(score)
}
