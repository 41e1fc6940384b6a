// handlers/doctor.rs - /doctors endpoints

use axum::extract::{Path, State};
use serde_json::Value;

use super::patch_body;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, JsonBody};
use crate::models::{Doctor, DoctorPatch, DoctorRequest};
use crate::validation::Validate;
use crate::AppState;

/// POST /doctors - owner of the doctor's hospital, or an admin
pub async fn create_doctor(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(request): JsonBody<DoctorRequest>,
) -> ApiResult<Doctor> {
    request.validate()?;
    auth.require_hospital_access(&state, &request.hospital_id).await?;
    let doctor = state.doctors.create_doctor(request).await?;
    Ok(ApiResponse::created(doctor).with_message("Doctor successfully registered"))
}

/// GET /doctors/:id
pub async fn get_doctor_by_id(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Doctor> {
    let doctor = state.doctors.find_doctor_by_id(&id).await?;
    Ok(ApiResponse::success(doctor).with_message("Doctor successfully retrieved"))
}

/// GET /doctors/hospital/:id
pub async fn get_doctors_by_hospital_id(
    State(state): State<AppState>,
    Path(hospital_id): Path<String>,
) -> ApiResult<Vec<Doctor>> {
    let doctors = state.doctors.get_doctors_by_hospital_id(&hospital_id).await?;
    Ok(ApiResponse::success(doctors).with_message("Doctors successfully retrieved"))
}

/// PATCH /doctors/:id
pub async fn update_doctor_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<Value>,
) -> ApiResult<()> {
    let doctor = state.doctors.find_doctor_by_id(&id).await?;
    auth.require_hospital_access(&state, &doctor.hospital_id.to_string()).await?;

    let patch: DoctorPatch = patch_body(body)?;
    state.doctors.update_doctor_by_id(&id, patch).await?;
    Ok(ApiResponse::message("Doctor successfully updated"))
}

/// DELETE /doctors/:id
pub async fn delete_doctor_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let doctor = state.doctors.find_doctor_by_id(&id).await?;
    auth.require_hospital_access(&state, &doctor.hospital_id.to_string()).await?;

    match state.doctors.delete_doctor_by_id(&id).await? {
        0 => Err(ApiError::not_found("Doctor not found")),
        _ => Ok(ApiResponse::message("Doctor successfully deleted")),
    }
}
