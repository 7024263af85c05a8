use common::{Environment, LogLevel};
use inference::{LabelNames, ModelConfig};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub body_limit_bytes: usize,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub log_level: LogLevel,
    pub environment: Environment,
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub labels: LabelNames,
}

/// Load configuration from `GATEWAY_`-prefixed environment variables.
///
/// Nested keys use a double underscore, e.g. `GATEWAY_MODEL__PATH`.
pub fn get_configuration() -> Result<Config, config::ConfigError> {
    build_configuration(environment_source())
}

fn environment_source() -> config::Environment {
    config::Environment::with_prefix("GATEWAY")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn build_configuration(source: config::Environment) -> Result<Config, config::ConfigError> {
    let defaults = LabelNames::default();

    let config = config::Config::builder()
        .set_default("log_level", "info")?
        .set_default("environment", "development")?
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5000)?
        .set_default("server.body_limit_bytes", 16 * 1024 * 1024)?
        .set_default("model.path", "models/coffee_bean_classifier.onnx")?
        .set_default("model.input_width", 150)?
        .set_default("model.input_height", 150)?
        .set_default("model.intra_threads", 4)?
        .set_default("model.execution_provider", "cpu")?
        .set_default("labels.good", defaults.good)?
        .set_default("labels.defective", defaults.defective)?
        .add_source(source)
        .build()?;

    let config: Config = config.try_deserialize::<Config>()?;

    if config.model.input_width == 0 || config.model.input_height == 0 {
        return Err(config::ConfigError::Message(format!(
            "model input size must be non-zero, got {}x{}",
            config.model.input_width, config.model.input_height
        )));
    }

    Ok(config)
}
