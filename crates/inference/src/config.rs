use serde::Deserialize;

/// Where ONNX Runtime executes the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionProvider {
    Cpu,
    Cuda,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub path: String,
    pub input_width: u32,
    pub input_height: u32,
    pub intra_threads: usize,
    pub execution_provider: ExecutionProvider,
}

impl ModelConfig {
    pub fn input_size(&self) -> (u32, u32) {
        (self.input_width, self.input_height)
    }
}
