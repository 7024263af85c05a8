pub mod backend;
pub mod config;
pub mod error;
pub mod postprocessing;
pub mod service;

// Re-export commonly used types for convenience
pub use backend::{Classifier, ClassifierHandle, RawScore};
pub use config::{ExecutionProvider, ModelConfig};
pub use error::{ErrorKind, InferenceError, PipelineError};
pub use postprocessing::{Label, LabelNames, PredictionPayload, PredictionResult};
pub use service::{PredictionService, RawUpload};
