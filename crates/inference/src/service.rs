use crate::{
    backend::ClassifierHandle,
    error::PipelineError,
    postprocessing::{PredictionResult, format},
};
use common::span;
use preprocess::{CpuPreProcessor, decode};

/// A file part as received from the client.
#[derive(Debug, Clone)]
pub struct RawUpload {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub filename: String,
}

/// Runs uploads through decode, preprocess, inference and formatting.
///
/// Cheap to share: the only shared state is the classifier handle.
pub struct PredictionService {
    preprocessor: CpuPreProcessor,
    classifier: ClassifierHandle,
}

impl PredictionService {
    pub fn new(classifier: ClassifierHandle, input_size: (u32, u32)) -> Self {
        Self {
            preprocessor: CpuPreProcessor::new(input_size),
            classifier,
        }
    }

    /// Blocks for the duration of model inference; call from a blocking context.
    pub fn handle_predict(
        &self,
        upload: Option<RawUpload>,
    ) -> Result<PredictionResult, PipelineError> {
        let Some(upload) = upload else {
            tracing::debug!("No file part in request");
            return Err(PipelineError::MissingFile);
        };

        if upload.filename.is_empty() {
            tracing::debug!("No file selected (empty filename)");
            return Err(PipelineError::EmptyFilename);
        }

        let span = tracing::info_span!("predict", filename = %upload.filename);
        let _enter = span.enter();

        tracing::debug!(
            content_type = %upload.content_type,
            bytes = upload.bytes.len(),
            "Received file"
        );

        // Declared type is advisory only; decodability is the gate.
        if !upload.content_type.starts_with("image/") {
            tracing::warn!(
                content_type = %upload.content_type,
                "Content-Type is not an image type"
            );
        }

        let image = decode(&upload.bytes).inspect_err(|e| {
            tracing::debug!(error = %e, "Failed to decode image");
        })?;

        let (width, height) = image.dimensions();
        tracing::debug!(width, height, "Image decoded and converted to RGB");

        let tensor = self.preprocessor.preprocess(&image);
        tracing::debug!(shape = ?tensor.shape(), "Image preprocessed");

        let score = {
            let _infer_span = span!("model_inference");
            self.classifier.infer(&tensor).inspect_err(|e| {
                tracing::error!(error = %e, "Model inference failed");
            })?
        };

        let result = format(score);
        tracing::debug!(
            raw_output = result.raw_score,
            label = ?result.label,
            confidence = result.confidence,
            "Prediction complete"
        );

        Ok(result)
    }
}
