use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::warn;

use crate::{
    LooFinderError,
    assistant::{ClassificationResult, Classifier},
    detail::RestroomDetail,
    models::{Location, Restroom},
    store::{NewRestroom, RestroomStore},
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<RestroomStore>>,
    pub classifier: Classifier,
}

impl AppState {
    #[must_use]
    pub fn new(store: RestroomStore, classifier: Classifier) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            classifier,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct ChatRequest {
    pub query: String,
    /// Absent when the client has no location fix
    pub location: Option<Location>,
}

#[derive(Serialize, Deserialize)]
pub struct ReportRequest {
    pub score: u8,
}

#[derive(Deserialize)]
pub struct ViewerQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

fn status_for(err: &LooFinderError) -> StatusCode {
    match err {
        LooFinderError::Validation { .. } => StatusCode::BAD_REQUEST,
        LooFinderError::NotFound { .. } => StatusCode::NOT_FOUND,
        _ => {
            warn!("Request failed: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/restrooms", get(list_restrooms).post(submit_restroom))
        .route("/restrooms/{id}", get(get_restroom))
        .route("/restrooms/{id}/reports", post(report_cleanliness))
        .route("/chat", post(chat))
        .with_state(state)
}

async fn list_restrooms(State(state): State<AppState>) -> Json<Vec<Restroom>> {
    Json(state.store.read().await.all())
}

async fn get_restroom(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(viewer): Query<ViewerQuery>,
) -> Result<Json<RestroomDetail>, StatusCode> {
    let viewer = match (viewer.lat, viewer.lng) {
        (Some(lat), Some(lng)) => {
            Some(Location::try_new(lat, lng).map_err(|e| status_for(&e))?)
        }
        _ => None,
    };

    let store = state.store.read().await;
    let restroom = store.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(RestroomDetail::build(restroom, viewer.as_ref())))
}

async fn submit_restroom(
    State(state): State<AppState>,
    Json(payload): Json<NewRestroom>,
) -> Result<(StatusCode, Json<Restroom>), StatusCode> {
    let restroom = state
        .store
        .write()
        .await
        .submit(payload)
        .map_err(|e| status_for(&e))?;
    Ok((StatusCode::CREATED, Json(restroom)))
}

async fn report_cleanliness(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ReportRequest>,
) -> Result<Json<Restroom>, StatusCode> {
    let restroom = state
        .store
        .write()
        .await
        .report_cleanliness(&id, payload.score)
        .map_err(|e| status_for(&e))?;
    Ok(Json(restroom))
}

async fn chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ClassificationResult>, StatusCode> {
    let (location, has_location) = match payload.location {
        Some(location) => {
            location.validate().map_err(|e| status_for(&e))?;
            (location, true)
        }
        None => (Location::DEFAULT, false),
    };

    let candidates = state.store.read().await.all();
    let result = state
        .classifier
        .classify(&payload.query, has_location, &location, &candidates);
    Ok(Json(result))
}
