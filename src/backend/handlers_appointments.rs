//! Rendez-vous: création par un patient (avec notification aux médecins),
//! consultation selon le rôle, mise à jour par un médecin.

use axum::extract::Path;
use axum::{Extension, Json};
use log::info;

use crate::backend::middlewares::{AuthUser, DoctorUser, PatientUser};
use crate::backend::router::AppState;
use crate::models::{Appointment, AppointmentInput, AppointmentUpdate, Notification, Role};
use crate::utils::error_messages::{AppError, APPOINTMENT_NOT_FOUND, VALIDATION_ERROR};
use crate::utils::validation::TextInput;

pub async fn create_appointment(
    PatientUser(patient): PatientUser,
    Extension(state): Extension<AppState>,
    Json(mut payload): Json<AppointmentInput>,
) -> Result<Json<Appointment>, AppError> {
    payload.reason = TextInput::new_short_form(&payload.reason)
        .map_err(|_| AppError::BadRequest(VALIDATION_ERROR.to_string()))?
        .into_inner();

    let appointment = Appointment::new(payload, &patient);
    state.store.insert_appointment(&appointment).await?;

    // Pas de transaction: si cette écriture échoue, le rendez-vous reste sans notification.
    let notification = Notification::for_appointment(&appointment);
    state.store.insert_notification(&notification).await?;

    info!(
        "Appointment {} created by {}, notification {} queued",
        appointment.id, patient.username, notification.id
    );
    Ok(Json(appointment))
}

pub async fn list_appointments(
    AuthUser(user): AuthUser,
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let appointments = match user.role {
        Role::Doctor => state.store.list_appointments(None).await?,
        Role::Patient => state.store.list_appointments(Some(&user.account_id())).await?,
    };
    Ok(Json(appointments))
}

pub async fn update_appointment(
    DoctorUser(doctor): DoctorUser,
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<AppointmentUpdate>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = state
        .store
        .update_appointment(&id, payload.status, payload.notes.as_deref(), &doctor.account_id())
        .await?
        .ok_or(AppError::NotFound(APPOINTMENT_NOT_FOUND))?;

    info!("Appointment {} set to {} by {}", appointment.id, appointment.status, doctor.username);
    Ok(Json(appointment))
}
