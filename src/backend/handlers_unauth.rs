//! Routes accessibles sans authentification: accueil, sonde de vie,
//! inscription et connexion.

use axum::{Extension, Json};
use log::{info, warn};
use serde_json::{json, Value};

use crate::backend::router::AppState;
use crate::models::{now, LoginRequest, RegisterRequest, TokenResponse, User};
use crate::utils::error_messages::{AppError, ALREADY_REGISTERED, REGISTRATION_ERROR};
use crate::utils::password_utils::{hash, verify};
use crate::utils::validation::{EmailInput, TextInput};

pub async fn index() -> Json<Value> {
    Json(json!({ "message": "Clinic backend is running" }))
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": now().to_rfc3339(),
    }))
}

/// Inscription d'un nouvel utilisateur
pub async fn register(
    Extension(state): Extension<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<Value>, AppError> {
    let invalid = |_| AppError::BadRequest(REGISTRATION_ERROR.to_string());

    let username = TextInput::new_short_form(&payload.username).map_err(invalid)?;
    let email = EmailInput::new(&payload.email).map_err(invalid)?;
    let full_name = match payload.full_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => TextInput::new_short_form(name).map_err(invalid)?.into_inner(),
        _ => String::new(),
    };
    if payload.password.is_empty() {
        return Err(AppError::BadRequest(REGISTRATION_ERROR.to_string()));
    }

    if state.store.user_exists(username.as_str(), email.as_str()).await? {
        warn!("Registration rejected, {} or {} already taken", username.as_str(), email.as_str());
        return Err(AppError::BadRequest(ALREADY_REGISTERED.to_string()));
    }

    let hashed_password =
        hash(&payload.password).map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))?;

    let user = User::new(
        username.into_inner(),
        email.into_inner(),
        payload.role,
        full_name,
        hashed_password,
    );
    state.store.insert_user(&user).await?;
    info!("Registered {} as {}", user.username, user.role);

    Ok(Json(json!({
        "message": "User registered successfully",
        "role": user.role,
    })))
}

/// Connexion: renvoie un jeton d'accès.
///
/// La vérification du mot de passe est faite même si l'utilisateur n'existe
/// pas, et l'erreur est identique dans les deux cas. Le username est
/// normalisé comme à l'inscription.
pub async fn login(
    Extension(state): Extension<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let user = match TextInput::new_short_form(&payload.username) {
        Ok(username) => state.store.find_user_by_username(username.as_str()).await?,
        Err(_) => None,
    };

    let valid = verify(&payload.password, user.as_ref().map(|u| &u.hashed_password));
    let user = match user {
        Some(user) if valid => user,
        _ => {
            warn!("Failed login for {}", payload.username);
            return Err(AppError::InvalidCredentials);
        }
    };

    let user_id = user.account_id();
    let access_token = state
        .tokens
        .issue(&user.username, user.role, &user_id)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    info!("{} logged in", user.username);

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        user_role: user.role,
        user_id,
    }))
}
