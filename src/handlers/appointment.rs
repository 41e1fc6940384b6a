// handlers/appointment.rs - /appointments endpoints (all protected)

use axum::extract::{Path, State};
use serde_json::Value;

use super::patch_body;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, JsonBody};
use crate::models::{Appointment, AppointmentPatch, AppointmentRequest};
use crate::AppState;

/// POST /appointments - booked for the caller
pub async fn create_appointment(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(request): JsonBody<AppointmentRequest>,
) -> ApiResult<Appointment> {
    let appointment = state.appointments.create_appointment(request, auth.user_id()).await?;
    Ok(ApiResponse::created(appointment).with_message("Appointment created successfully"))
}

/// GET /appointments/:id
pub async fn get_single_appointment_by_id(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Appointment> {
    let appointment = state.appointments.get_single_appointment_by_id(&id).await?;
    Ok(ApiResponse::success(appointment).with_message("Appointment retrieved successfully"))
}

/// GET /appointments/user/:id
pub async fn get_appointments_by_user_id(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(user_id): Path<String>,
) -> ApiResult<Vec<Appointment>> {
    let appointments = state.appointments.get_appointments_by_user_id(&user_id).await?;
    Ok(ApiResponse::success(appointments).with_message("User's Appointments successfully retrieved"))
}

/// GET /appointments/doctor/:id
pub async fn get_appointments_by_doctor_id(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(doctor_id): Path<String>,
) -> ApiResult<Vec<Appointment>> {
    let appointments = state.appointments.get_appointments_by_doctor_id(&doctor_id).await?;
    Ok(ApiResponse::success(appointments).with_message("Doctor's Appointments successfully retrieved"))
}

/// PATCH /appointments/:id - responds with the updated appointment
pub async fn update_appointment_by_id(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<Value>,
) -> ApiResult<Appointment> {
    let patch: AppointmentPatch = patch_body(body)?;
    let appointment = state.appointments.update_appointment_by_id(&id, patch).await?;
    Ok(ApiResponse::success(appointment).with_message("Appointment updated successfully"))
}

/// DELETE /appointments/:id
pub async fn delete_appointment_by_id(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<()> {
    match state.appointments.delete_appointment_by_id(&id).await? {
        0 => Err(ApiError::not_found("Appointment not found")),
        _ => Ok(ApiResponse::message("Appointment deleted successfully")),
    }
}
