//! API сервер предсказания массы тела

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::State,
    http::Method,
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use penguin_ml::types::{round2, FeatureRecord, PredictResponse};
use penguin_ml::ModelArtifact;

/// Один загруженный артефакт на процесс. После загрузки артефакт
/// неизменяем, поэтому обработчики разделяют его без блокировок.
#[derive(Clone)]
struct AppState {
    artifact: Arc<ModelArtifact>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let model_path = std::env::var("MODEL_PATH").context("MODEL_PATH is not set")?;
    let artifact = ModelArtifact::load(Path::new(&model_path))?;
    tracing::info!("Model loaded from {model_path}");

    let state = AppState {
        artifact: Arc::new(artifact),
    };

    // CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/predict", post(predict))
        .layer(cors)
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 8000));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Alive and ready to predict"
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Батч предсказаний: по одному значению на запись, в порядке входа.
async fn predict(
    State(state): State<AppState>,
    Json(records): Json<Vec<FeatureRecord>>,
) -> Json<PredictResponse> {
    tracing::info!("Predict request: {} record(s)", records.len());

    let predictions = state
        .artifact
        .predict(&records)
        .into_iter()
        .map(round2)
        .collect();

    Json(PredictResponse { predictions })
}
