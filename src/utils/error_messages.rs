//! Represents all possible errors in the application

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde_json::json;
use thiserror::Error;

use crate::database::StoreError;
use crate::models::Role;

pub const AUTH_FAILED: &str = "Could not validate credentials";

pub const LOGIN_ERROR: &str = "Incorrect username or password";

pub const REGISTRATION_ERROR: &str = "Invalid registration data";

pub const ALREADY_REGISTERED: &str = "Username or email already registered";

pub const VALIDATION_ERROR: &str = "Validation failed";

pub const ACCESS_DENIED: &str = "Access denied";

pub const PATIENT_NOT_FOUND: &str = "Patient not found";

pub const APPOINTMENT_NOT_FOUND: &str = "Appointment not found";

pub const NOTIFICATION_NOT_FOUND: &str = "Notification not found";

const INTERNAL_ERROR: &str = "Internal server error";

/// Erreurs remontées par les handlers, chacune associée à un statut HTTP.
#[derive(Debug, Error)]
pub enum AppError {
    /// Jeton absent, invalide, expiré, ou titulaire inconnu
    #[error("Could not validate credentials")]
    Unauthorized,

    /// Même réponse que l'utilisateur existe ou non
    #[error("Incorrect username or password")]
    InvalidCredentials,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn role_required(role: Role) -> Self {
        AppError::Forbidden(format!("{ACCESS_DENIED}. {role} role required."))
    }

    pub fn access_denied() -> Self {
        AppError::Forbidden(ACCESS_DENIED.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            AppError::Internal(cause) => {
                error!("Internal error: {cause}");
                INTERNAL_ERROR.to_string()
            }
            other => other.to_string(),
        };

        let mut response = (status, Json(json!({ "detail": detail }))).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Internal(err.to_string())
    }
}
