//! Assistant conversationnel, accessible à tout utilisateur authentifié.

use axum::{Extension, Json};

use crate::backend::middlewares::AuthUser;
use crate::backend::router::AppState;
use crate::chat;
use crate::models::{now, ChatMessage, ChatResponse};
use crate::utils::error_messages::AppError;

/// Relaie un message au modèle de langage, avec le contexte d'un patient si
/// `patient_id` désigne une fiche existante.
pub async fn chat(
    AuthUser(user): AuthUser,
    Extension(state): Extension<AppState>,
    Json(payload): Json<ChatMessage>,
) -> Result<Json<ChatResponse>, AppError> {
    let patient = match payload.patient_id.as_deref() {
        Some(id) => state.store.get_patient(id).await?,
        None => None,
    };

    let response = chat::relay(state.llm.as_ref(), user.role, patient.as_ref(), &payload.message).await;

    Ok(Json(ChatResponse {
        response,
        timestamp: now(),
    }))
}
