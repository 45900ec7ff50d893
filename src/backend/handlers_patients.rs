//! Registre des patients.
//! Les médecins gèrent les fiches; un patient ne voit que celles portant son email.

use axum::extract::Path;
use axum::{Extension, Json};
use log::info;
use serde_json::{json, Value};

use crate::backend::middlewares::{AuthUser, DoctorUser};
use crate::backend::router::AppState;
use crate::models::{Patient, PatientInput, Role};
use crate::utils::error_messages::{AppError, PATIENT_NOT_FOUND, VALIDATION_ERROR};
use crate::utils::validation::{EmailInput, TextInput};

/// Valide le nom et l'email saisis par le médecin.
fn validated(mut details: PatientInput) -> Result<PatientInput, AppError> {
    let invalid = |_| AppError::BadRequest(VALIDATION_ERROR.to_string());
    details.name = TextInput::new_short_form(&details.name).map_err(invalid)?.into_inner();
    details.email = EmailInput::new(&details.email).map_err(invalid)?.into_inner();
    if !details.medical_notes.trim().is_empty() {
        details.medical_notes = TextInput::new_long_form(&details.medical_notes)
            .map_err(invalid)?
            .into_inner();
    }
    Ok(details)
}

pub async fn create_patient(
    DoctorUser(doctor): DoctorUser,
    Extension(state): Extension<AppState>,
    Json(payload): Json<PatientInput>,
) -> Result<Json<Patient>, AppError> {
    let patient = Patient::new(validated(payload)?, &doctor.account_id());

    state.store.insert_patient(&patient).await?;
    info!("Patient {} created by {}", patient.id, doctor.username);
    Ok(Json(patient))
}

pub async fn list_patients(
    AuthUser(user): AuthUser,
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<Patient>>, AppError> {
    let email = match user.role {
        Role::Doctor => None,
        Role::Patient => Some(user.email.as_str()),
    };
    Ok(Json(state.store.list_patients(email).await?))
}

pub async fn get_patient(
    AuthUser(user): AuthUser,
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Patient>, AppError> {
    let patient = state
        .store
        .get_patient(&id)
        .await?
        .ok_or(AppError::NotFound(PATIENT_NOT_FOUND))?;

    if user.role == Role::Patient && patient.details.email != user.email {
        return Err(AppError::access_denied());
    }
    Ok(Json(patient))
}

pub async fn update_patient(
    DoctorUser(doctor): DoctorUser,
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<PatientInput>,
) -> Result<Json<Patient>, AppError> {
    let details = validated(payload)?;

    let patient = state
        .store
        .update_patient(&id, &details)
        .await?
        .ok_or(AppError::NotFound(PATIENT_NOT_FOUND))?;
    info!("Patient {} updated by {}", patient.id, doctor.username);
    Ok(Json(patient))
}

pub async fn delete_patient(
    DoctorUser(doctor): DoctorUser,
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    if !state.store.delete_patient(&id).await? {
        return Err(AppError::NotFound(PATIENT_NOT_FOUND));
    }
    info!("Patient {id} deleted by {}", doctor.username);
    Ok(Json(json!({ "message": "Patient deleted successfully" })))
}
