use super::{Classifier, RawScore, score_from_output};
use crate::config::{ExecutionProvider, ModelConfig};
use crate::error::InferenceError;
use ort::{
    session::{Session, builder::GraphOptimizationLevel},
    value::TensorRef,
};
use preprocess::FeatureTensor;
use std::sync::{Mutex, PoisonError};

impl From<ort::Error> for InferenceError {
    fn from(err: ort::Error) -> Self {
        InferenceError::Runtime(err.to_string())
    }
}

/// ONNX Runtime classifier expecting a single NHWC input and a single
/// sigmoid output of shape `[1, 1]`.
pub struct OrtClassifier {
    // `Session::run` needs `&mut`, so concurrent requests take turns.
    session: Mutex<Session>,
}

impl OrtClassifier {
    /// Load model with the given execution provider and intra-op thread count
    pub fn load_model_with_provider(
        path: &str,
        provider: ExecutionProvider,
        intra_threads: usize,
    ) -> anyhow::Result<Self> {
        // Initialize ORT environment (idempotent)
        let _ = ort::init().commit();

        let builder = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(intra_threads)?;

        let builder = match provider {
            #[cfg(feature = "cuda")]
            ExecutionProvider::Cuda => {
                tracing::info!("Initializing ONNX Runtime with CUDA execution provider");
                builder.with_execution_providers([
                    ort::execution_providers::CUDAExecutionProvider::default()
                        .with_device_id(0)
                        .build()
                        .error_on_failure(),
                ])?
            }
            #[cfg(not(feature = "cuda"))]
            ExecutionProvider::Cuda => {
                anyhow::bail!("CUDA execution provider requested but the `cuda` feature is disabled");
            }
            ExecutionProvider::Cpu => {
                tracing::info!("Initializing ONNX Runtime with CPU execution provider");
                builder
            }
        };

        let session = builder.commit_from_file(path)?;

        tracing::info!("Model loaded from {}", path);
        Ok(Self {
            session: Mutex::new(session),
        })
    }

    pub fn load_model(config: &ModelConfig) -> anyhow::Result<Self> {
        Self::load_model_with_provider(
            &config.path,
            config.execution_provider,
            config.intra_threads,
        )
    }
}

impl Classifier for OrtClassifier {
    fn infer(&self, tensor: &FeatureTensor) -> Result<RawScore, InferenceError> {
        // A panic mid-run leaves the session itself intact; keep serving.
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);

        let outputs = session.run(ort::inputs![TensorRef::from_array_view(tensor.view())?])?;

        score_from_output(outputs[0].try_extract_array::<f32>()?)
    }
}
