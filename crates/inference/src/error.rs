use preprocess::DecodeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("model invocation failed: {0}")]
    Runtime(String),

    #[error("unexpected model output: {0}")]
    InvalidOutput(String),

    #[error("inference task aborted: {0}")]
    Aborted(String),
}

/// Who is at fault for a failed prediction request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad upload; the caller can fix it and retry.
    ClientInput,
    /// The model or runtime failed; the process keeps serving.
    Backend,
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("No file part in the request. Ensure you send a file with the key \"file\".")]
    MissingFile,

    #[error("No file selected.")]
    EmptyFilename,

    #[error("Failed to open image: {0}. Is it a valid image file?")]
    Decode(#[from] DecodeError),

    #[error("Failed to process image or perform prediction: {0}")]
    Inference(#[from] InferenceError),
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::MissingFile
            | PipelineError::EmptyFilename
            | PipelineError::Decode(_) => ErrorKind::ClientInput,
            PipelineError::Inference(_) => ErrorKind::Backend,
        }
    }
}
