//! HTTP surface.
//!
//! - `GET  /`                  greeting
//! - `GET  /api/hello`         greeting
//! - `GET  /test`              store and configuration diagnostics
//! - `POST /api/generate`      validate, derive and persist a generation
//! - `GET  /api/generations`   list stored generations (`?limit=`, default 20)

use std::sync::Arc;

use anyhow::Result;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{DefaultBodyLimit, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::diagnostics::{self, DiagnosticsReport};
use crate::error::{ServiceError, json_error};
use crate::generation::{
    DEFAULT_LIST_LIMIT, GenerateRequest, GenerationRecord, GenerationService, ListingService,
};
use crate::store::RecordStore;

const MAX_BODY_SIZE: usize = 1024 * 1024;

pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn RecordStore>,
    pub generations: GenerationService,
    pub listings: ListingService,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn RecordStore>) -> Result<Self> {
        let template = config.image_template()?;
        Ok(Self {
            generations: GenerationService::new(store.clone(), template),
            listings: ListingService::new(store.clone()),
            config: Arc::new(config),
            store,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<usize>,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/api/hello", get(hello))
        .route("/test", get(diagnostics_report))
        .route("/api/generate", post(generate_image))
        .route("/api/generations", get(list_generations))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Hello from the prompt-canvas backend!" }))
}

pub async fn hello() -> Json<Value> {
    Json(json!({ "message": "Hello from the backend API!" }))
}

pub async fn diagnostics_report(State(state): State<Arc<AppState>>) -> Json<DiagnosticsReport> {
    Json(diagnostics::inspect(state.store.as_ref(), &state.config).await)
}

pub async fn generate_image(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerationRecord>, ServiceError> {
    let Json(request) =
        payload.map_err(|rejection| ServiceError::InvalidInput(rejection.body_text()))?;
    let record = state.generations.generate_from(&request).await?;
    Ok(Json(record))
}

pub async fn list_generations(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<GenerationRecord>>, ServiceError> {
    let Query(params) =
        params.map_err(|rejection| ServiceError::InvalidInput(rejection.body_text()))?;
    let records = state
        .listings
        .list(params.limit.unwrap_or(DEFAULT_LIST_LIMIT))
        .await?;
    Ok(Json(records))
}

async fn not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, "Not Found")
}
