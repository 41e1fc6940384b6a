// handlers/user.rs - /users endpoints

use axum::extract::{Path, State};
use serde_json::Value;

use super::patch_body;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, JsonBody};
use crate::models::{
    DocumentId, LoginRequest, LoginResponse, PublicUser, RefreshRequest, RegisterUserRequest, Role, TokenResponse,
    UserPatch,
};
use crate::validation::Validate;
use crate::AppState;

/// POST /users - register a new account
pub async fn register_user(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RegisterUserRequest>,
) -> ApiResult<PublicUser> {
    let user = state.users.register_user(request).await?;
    Ok(ApiResponse::created(PublicUser::from(user)).with_message("User Created Successfully"))
}

/// POST /users/login - exchange credentials for an access and a refresh token
pub async fn login_user(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let response = state.users.login_user(request).await?;
    Ok(ApiResponse::success(response).with_message("Login successful"))
}

/// POST /users/refresh - exchange a refresh token for a new access token
pub async fn refresh_token(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RefreshRequest>,
) -> ApiResult<TokenResponse> {
    request.validate()?;
    let response = state.users.refresh_token(&request.refresh_token).await?;
    Ok(ApiResponse::success(response).with_message("Token refreshed successfully"))
}

/// GET /users/:id
pub async fn get_user_by_id(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<PublicUser> {
    let user = state.users.get_user_by_id(&id).await?;
    Ok(ApiResponse::success(PublicUser::from(user)).with_message("User retrieved successfully"))
}

/// PATCH /users/:id - the user themselves or an admin
pub async fn update_user_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<Value>,
) -> ApiResult<()> {
    let user_id = DocumentId::parse(&id)?;
    auth.require_self_or(&state, &user_id, &[Role::Admin]).await?;

    // 404 before looking at the payload
    state.users.get_user_by_id(&id).await?;
    let patch: UserPatch = patch_body(body)?;

    state.users.update_user_by_id(&id, patch).await?;
    Ok(ApiResponse::message("User updated successfully"))
}

/// DELETE /users/:id - the user themselves or an admin
pub async fn delete_user_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let user_id = DocumentId::parse(&id)?;
    auth.require_self_or(&state, &user_id, &[Role::Admin]).await?;

    match state.users.delete_user_by_id(&id).await? {
        0 => Err(ApiError::not_found("No user got deleted")),
        _ => Ok(ApiResponse::no_content()),
    }
}
