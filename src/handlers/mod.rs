// handlers/mod.rs - HTTP handlers, one module per resource
//
// Public routes need no token; everything else sits behind
// `jwt_auth_middleware` and receives the caller as `AuthUser`.

pub mod appointment;
pub mod doctor;
pub mod health;
pub mod hospital;
pub mod user;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// Fields the store manages itself; a PATCH body may not touch them.
const SYSTEM_FIELDS: &[&str] = &["_id", "createdAt", "updatedAt"];

/// Decode a PATCH body into its typed patch, rejecting system fields first.
pub fn patch_body<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    let Value::Object(fields) = &body else {
        return Err(ApiError::bad_request("Invalid update payload: expected a JSON object"));
    };
    if let Some(field) = SYSTEM_FIELDS.iter().find(|f| fields.contains_key(**f)) {
        return Err(ApiError::bad_request(format!("Invalid update payload: {} cannot be updated", field)));
    }
    serde_json::from_value(body).map_err(|e| ApiError::bad_request(format!("Invalid update payload: {}", e)))
}
