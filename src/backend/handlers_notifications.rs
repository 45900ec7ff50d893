//! Fil de notifications des médecins.

use axum::extract::Path;
use axum::{Extension, Json};
use serde_json::{json, Value};

use crate::backend::middlewares::DoctorUser;
use crate::backend::router::AppState;
use crate::consts::NOTIFICATION_FEED_LIMIT;
use crate::models::Notification;
use crate::utils::error_messages::{AppError, NOTIFICATION_NOT_FOUND};

pub async fn list_notifications(
    _doctor: DoctorUser,
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<Notification>>, AppError> {
    Ok(Json(state.store.list_notifications(NOTIFICATION_FEED_LIMIT).await?))
}

pub async fn mark_notification_read(
    _doctor: DoctorUser,
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    if !state.store.mark_notification_read(&id).await? {
        return Err(AppError::NotFound(NOTIFICATION_NOT_FOUND));
    }
    Ok(Json(json!({ "message": "Notification marked as read" })))
}
