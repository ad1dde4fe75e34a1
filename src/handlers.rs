use crate::errors::AppError;
use crate::models::{HealthResponse, Session, TrackerKind, TrackerRecord, TrackerSummaryResponse};
use crate::state::AppState;
use crate::trackers::{TrackerSlice, dashboard, summary_value};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use tracing::debug;

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn create_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<TrackerRecord>, AppError> {
    let user_id = checked_user(&user_id)?;
    let mut store = state.store.lock().await;
    let record = store.create_default(user_id).await?;
    Ok(Json(record))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<TrackerRecord>, AppError> {
    let user_id = checked_user(&user_id)?;
    let store = state.store.lock().await;
    store
        .get(user_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("no record for user '{user_id}'")))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let user_id = checked_user(&user_id)?;
    let mut store = state.store.lock().await;
    store.delete(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_tracker(
    State(state): State<AppState>,
    Path((user_id, tracker)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    let user_id = checked_user(&user_id)?;
    let kind: TrackerKind = tracker.parse()?;
    let slice = current_slice(&state, user_id, kind).await;
    Ok(Json(slice.to_value()?))
}

pub async fn put_tracker(
    State(state): State<AppState>,
    Path((user_id, tracker)): Path<(String, String)>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let user_id = checked_user(&user_id)?;
    let kind: TrackerKind = tracker.parse()?;
    let mut store = state.store.lock().await;
    let slice = store.set(user_id, kind, payload).await?;
    Ok(Json(slice.to_value()?))
}

pub async fn reset_tracker(
    State(state): State<AppState>,
    Path((user_id, tracker)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    let user_id = checked_user(&user_id)?;
    let kind: TrackerKind = tracker.parse()?;
    let mut store = state.store.lock().await;
    store.reset(user_id, kind).await?;
    Ok(Json(TrackerSlice::default_for(kind).to_value()?))
}

pub async fn tracker_summary(
    State(state): State<AppState>,
    Path((user_id, tracker)): Path<(String, String)>,
) -> Result<Json<TrackerSummaryResponse>, AppError> {
    let user_id = checked_user(&user_id)?;
    let kind: TrackerKind = tracker.parse()?;
    let slice = current_slice(&state, user_id, kind).await;
    let session = Session::now(user_id);
    debug!(%user_id, %kind, today = %session.today, "summarizing tracker");

    let summary = summary_value(&slice, &session, state.config.insight_limit)?;
    Ok(Json(TrackerSummaryResponse {
        user_id: session.user_id,
        tracker: kind,
        today: session.today,
        summary,
    }))
}

pub async fn user_dashboard(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<dashboard::Dashboard>, AppError> {
    let user_id = checked_user(&user_id)?;
    let record = {
        let store = state.store.lock().await;
        store
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| TrackerRecord::new(user_id))
    };
    let session = Session::now(user_id);
    Ok(Json(dashboard::build(&record, &session)))
}

async fn current_slice(state: &AppState, user_id: &str, kind: TrackerKind) -> TrackerSlice {
    let store = state.store.lock().await;
    store
        .get(user_id)
        .map(|record| record.slice(kind))
        .unwrap_or_else(|| TrackerSlice::default_for(kind))
}

// Surrounding whitespace is not part of a user id.
fn checked_user(user_id: &str) -> Result<&str, AppError> {
    let trimmed = user_id.trim();
    if trimmed.is_empty() {
        return Err(AppError::bad_request("user id must not be blank"));
    }
    Ok(trimmed)
}
