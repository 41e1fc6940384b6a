use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::warn;

use crate::auth::{AuthError, Claims, JwtKeys, TokenKind};
use crate::error::ApiError;
use crate::models::{DocumentId, Hospital, Role};
use crate::AppState;

/// Authenticated caller, taken from the claims the middleware verified.
#[derive(Clone, Debug)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> DocumentId {
        self.0.userid
    }

    pub fn is(&self, id: &DocumentId) -> bool {
        self.0.userid == *id
    }

    /// Succeeds when the caller is `id` or holds one of `roles`.
    pub async fn require_self_or(&self, state: &AppState, id: &DocumentId, roles: &[Role]) -> Result<(), ApiError> {
        if self.is(id) {
            return Ok(());
        }
        state.users.require_role(&self.user_id(), roles).await?;
        Ok(())
    }

    /// Loads hospital `id` and succeeds when the caller owns it or is an admin.
    pub async fn require_hospital_access(&self, state: &AppState, id: &str) -> Result<Hospital, ApiError> {
        let hospital = state.hospitals.get_hospital_by_id(id).await?;
        self.require_self_or(state, &hospital.user_id, &[Role::Admin]).await?;
        Ok(hospital)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| ApiError::unauthorized("User not authenticated"))
    }
}

/// JWT authentication middleware: verifies the bearer access token and
/// injects its claims into request extensions. Any failure ends the request.
pub async fn jwt_auth_middleware(
    State(keys): State<Arc<JwtKeys>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = extract_bearer_token(request.headers())
        .and_then(|token| keys.validate_kind(token, TokenKind::Access))
        .map_err(|e| {
            warn!("Rejected request to {}: {}", request.uri().path(), e);
            ApiError::from(e)
        })?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Extract the token from `Authorization: Bearer <token>`
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers.get(AUTHORIZATION).ok_or(AuthError::MissingHeader)?;
    let value = header.to_str().map_err(|_| AuthError::InvalidFormat)?;

    let parts: Vec<&str> = value.split_whitespace().collect();
    match parts.as_slice() {
        ["Bearer", token] => Ok(*token),
        _ => Err(AuthError::InvalidFormat),
    }
}
