pub mod storage;

use anyhow::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use docsearch_core::extract::{ArtifactKind, DefaultExtractor, TextExtractor};
use docsearch_core::{DocId, Document, IndexConfig, ScoredDoc, SearchService};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use storage::UploadDir;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub upload_dir: PathBuf,
    pub index: IndexConfig,
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { upload_dir: PathBuf::from("uploads"), index: IndexConfig::default(), max_upload_bytes: 32 * 1024 * 1024 }
    }
}

#[derive(Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub document: String,
    pub doc_id: DocId,
    pub score: f32,
}

impl From<ScoredDoc> for SearchHit {
    fn from(s: ScoredDoc) -> Self {
        Self { document: Document::label(s.doc_id), doc_id: s.doc_id, score: s.score }
    }
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub doc_id: DocId,
    pub total_docs: usize,
}

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SearchService>,
    pub uploads: UploadDir,
    pub extractor: Arc<dyn TextExtractor>,
}

/// Client-visible failure rendered as `{"error": message}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(msg: impl ToString) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: msg.to_string() }
    }

    pub fn not_found(msg: impl ToString) -> Self {
        Self { status: StatusCode::NOT_FOUND, message: msg.to_string() }
    }

    pub fn internal(msg: impl ToString) -> Self {
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, message: msg.to_string() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "error": self.message }))).into_response()
    }
}

impl From<docsearch_core::Error> for ApiError {
    fn from(err: docsearch_core::Error) -> Self {
        if err.is_empty_state() {
            ApiError::bad_request("no documents uploaded yet")
        } else {
            ApiError::internal(err)
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self { status: rejection.status(), message: rejection.body_text() }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!(error = %err, "request failed");
        ApiError::internal(err)
    }
}

pub fn build_app(config: AppConfig) -> Result<Router> {
    let app_state = AppState {
        service: Arc::new(SearchService::new(config.index)),
        uploads: UploadDir::new(&config.upload_dir)?,
        extractor: Arc::new(DefaultExtractor),
    };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/upload", post(upload_handler))
        .route("/search", get(search_get_handler).post(search_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .with_state(app_state)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors);
    Ok(app)
}

pub async fn upload_handler(State(state): State<AppState>, mut multipart: Multipart) -> Result<Json<UploadResponse>, ApiError> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(ApiError::bad_request)? {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.map_err(ApiError::bad_request)?;
            upload = Some((file_name, bytes));
            break;
        }
    }
    let (file_name, bytes) = upload.ok_or_else(|| ApiError::bad_request("no file uploaded"))?;
    if file_name.is_empty() {
        return Err(ApiError::bad_request("empty filename"));
    }
    if std::path::Path::new(&file_name).file_name().is_none() {
        return Err(ApiError::bad_request("invalid filename"));
    }

    // Extraction and the full rebuild are CPU-bound
    let name = file_name.clone();
    let doc_id = tokio::task::spawn_blocking(move || -> Result<DocId> {
        let path = state.uploads.save(&name, &bytes)?;
        // extract from the request body, the saved file may already be replaced by a same-named upload
        let text = match state.extractor.extract(&bytes, ArtifactKind::from_path(&path)) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "extraction failed, indexing as empty document");
                String::new()
            }
        };
        Ok(state.service.add_document(text)?)
    })
    .await
    .map_err(ApiError::internal)??;

    tracing::info!(file = %file_name, doc_id, "document indexed");
    Ok(Json(UploadResponse { message: format!("{file_name} processed"), doc_id, total_docs: doc_id as usize }))
}

pub async fn search_handler(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<Vec<SearchHit>>, ApiError> {
    let Json(req) = payload?;
    run_search(state, req.query).await
}

pub async fn search_get_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Result<Json<Vec<SearchHit>>, ApiError> {
    run_search(state, params.q).await
}

// The read lock waits out any rebuild in flight, so keep it off the async workers
async fn run_search(state: AppState, query: String) -> Result<Json<Vec<SearchHit>>, ApiError> {
    let ranked = tokio::task::spawn_blocking(move || state.service.score(&query))
        .await
        .map_err(ApiError::internal)??;
    Ok(Json(ranked.into_iter().map(SearchHit::from).collect()))
}

pub async fn doc_handler(State(state): State<AppState>, Path(doc_id): Path<DocId>) -> Result<Json<serde_json::Value>, ApiError> {
    let doc = tokio::task::spawn_blocking(move || state.service.document(doc_id))
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::not_found("not found"))?;
    Ok(Json(serde_json::json!({
        "doc_id": doc.id,
        "document": Document::label(doc.id),
        "text": doc.text,
    })))
}
