// handlers/hospital.rs - /hospitals endpoints

use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::{json, Value};

use super::patch_body;
use crate::error::ApiError;
use crate::filter::Filter;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, JsonBody};
use crate::models::{Hospital, HospitalPatch, HospitalRequest, Role, Specialty, UnknownVariant};
use crate::validation::Validate;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct HospitalQuery {
    /// Only hospitals offering this specialty, e.g. `?specialty=dentist`
    pub specialty: Option<String>,
}

/// POST /hospitals - the caller becomes the owner and gains `hospital_owner`
pub async fn create_hospital(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(request): JsonBody<HospitalRequest>,
) -> ApiResult<Hospital> {
    request.validate()?;
    // The owner must still exist before anything is stored.
    state.users.grant_role(&auth.user_id(), Role::HospitalOwner).await?;
    let hospital = state.hospitals.create_hospital(request, auth.user_id()).await?;
    Ok(ApiResponse::created(hospital).with_message("Hospital Successfully created"))
}

/// GET /hospitals[?specialty=]
pub async fn get_hospitals(
    State(state): State<AppState>,
    Query(query): Query<HospitalQuery>,
) -> ApiResult<Vec<Hospital>> {
    let hospitals = match query.specialty {
        Some(raw) => {
            let specialty: Specialty = raw.parse().map_err(|e: UnknownVariant| ApiError::bad_request(e.to_string()))?;
            let filter = Filter::new(&json!({ "specialties": specialty }))?;
            state.hospitals.get_hospitals_by_query(&filter).await?
        }
        None => state.hospitals.get_all_hospitals().await?,
    };
    Ok(ApiResponse::success(hospitals).with_message("Hospitals retrieved successfully"))
}

/// GET /hospitals/:id
pub async fn get_hospital_by_id(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Hospital> {
    let hospital = state.hospitals.get_hospital_by_id(&id).await?;
    Ok(ApiResponse::success(hospital).with_message("Successfully retrieved hospital"))
}

/// PATCH /hospitals/:id - owner or admin; responds with the updated hospital
pub async fn update_hospital_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<Value>,
) -> ApiResult<Hospital> {
    auth.require_hospital_access(&state, &id).await?;
    let patch: HospitalPatch = patch_body(body)?;
    let hospital = state.hospitals.update_hospital_by_id(&id, patch).await?;
    Ok(ApiResponse::success(hospital).with_message("Hospital updated successfully"))
}

/// DELETE /hospitals/:id - owner or admin
pub async fn delete_hospital(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<()> {
    auth.require_hospital_access(&state, &id).await?;
    match state.hospitals.delete_hospital(&id).await? {
        0 => Err(ApiError::not_found("Hospital not found")),
        _ => Ok(ApiResponse::message("Hospital deleted successfully")),
    }
}
