use crate::{config::ServerConfig, error::ApiError, state::AppState, upload::read_upload};
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartRejection},
    routing::{get, post},
};
use inference::{InferenceError, PipelineError, PredictionPayload};
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub const HOME_MESSAGE: &str =
    "Coffee Bean Quality Classification API is Running! Use the /predict endpoint for predictions.";

pub fn build_router(state: AppState, body_limit_bytes: usize) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/predict", post(predict))
        .layer(DefaultBodyLimit::max(body_limit_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run_server(config: &ServerConfig, state: AppState) -> anyhow::Result<()> {
    let app = build_router(state, config.body_limit_bytes);

    let address = config.address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("HTTP server listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn home() -> &'static str {
    HOME_MESSAGE
}

async fn predict(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PredictionPayload>, ApiError> {
    // Anything that is not a multipart body simply has no file part.
    let upload = match multipart {
        Ok(mut multipart) => read_upload(&mut multipart).await?,
        Err(rejection) => {
            tracing::debug!(%rejection, "Request body is not multipart");
            None
        }
    };

    let service = state.service.clone();
    let result = tokio::task::spawn_blocking(move || service.handle_predict(upload))
        .await
        .map_err(|e| PipelineError::Inference(InferenceError::Aborted(e.to_string())))??;

    Ok(Json(result.to_payload(&state.labels)))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, starting graceful shutdown");
        },
    }
}
