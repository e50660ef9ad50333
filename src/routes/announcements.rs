use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::{
    error::AppError,
    models::{
        announcement::{Announcement, CreateAnnouncementRequest, UpdateAnnouncementRequest},
        auth::AuthenticatedUser,
    },
    services::announcements::AnnouncementService,
    AppState,
};

/// GET /announcements: public, returns the announcements visible right now.
pub async fn list_announcements(
    State(state): State<AppState>,
) -> Result<Json<Vec<Announcement>>, AppError> {
    AnnouncementService::list_visible(state.store.as_ref(), Utc::now())
        .await
        .map(Json)
}

/// POST /announcements: any authenticated user.
pub async fn create_announcement(
    State(state): State<AppState>,
    user: Option<AuthenticatedUser>,
    Json(body): Json<CreateAnnouncementRequest>,
) -> Result<Json<Announcement>, AppError> {
    AnnouncementService::create(state.store.as_ref(), user.as_ref(), body, Utc::now())
        .await
        .map(Json)
}

/// PUT /announcements/{id}: partial update, any authenticated user.
pub async fn update_announcement(
    State(state): State<AppState>,
    user: Option<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(body): Json<UpdateAnnouncementRequest>,
) -> Result<Json<Announcement>, AppError> {
    AnnouncementService::update(state.store.as_ref(), user.as_ref(), &id, body)
        .await
        .map(Json)
}

/// DELETE /announcements/{id}
pub async fn delete_announcement(
    State(state): State<AppState>,
    user: Option<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    AnnouncementService::delete(state.store.as_ref(), user.as_ref(), &id).await?;
    Ok(Json(json!({ "success": true })))
}
