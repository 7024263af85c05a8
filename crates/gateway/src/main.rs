use anyhow::Context;
use gateway::{
    config::get_configuration, logging::setup_logging, server::run_server, state::AppState,
};
use inference::{ClassifierHandle, ModelConfig, PredictionService};
use std::sync::Arc;

#[cfg(feature = "ort-backend")]
use inference::backend::ort::OrtClassifier;

#[cfg(not(feature = "ort-backend"))]
compile_error!("The gateway binary needs a classifier backend: enable the 'ort-backend' feature");

fn load_classifier(config: &ModelConfig) -> anyhow::Result<ClassifierHandle> {
    let classifier = OrtClassifier::load_model(config)
        .with_context(|| format!("failed to load model from '{}'", config.path))?;
    Ok(Arc::new(classifier))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = get_configuration().context("failed to load configuration")?;
    setup_logging(&config);

    tracing::info!(
        config = ?config,
        environment = config.environment.as_str(),
        "Loaded configuration"
    );

    // Refuse to serve without a model.
    tracing::info!("Loading classifier model");
    let classifier = load_classifier(&config.model)?;
    tracing::info!("Model loaded successfully");

    let service = PredictionService::new(classifier, config.model.input_size());
    let state = AppState::new(service, config.labels.clone());

    run_server(&config.server, state).await
}
