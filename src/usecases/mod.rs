pub mod appointment;
pub mod doctor;
pub mod hospital;
pub mod user;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::auth::AuthError;
use crate::database::StoreError;
use crate::filter::Update;
use crate::validation::ValidationErrors;

pub use appointment::AppointmentUsecase;
pub use doctor::DoctorUsecase;
pub use hospital::HospitalUsecase;
pub use user::UserUsecase;

#[derive(Debug, Error)]
pub enum UsecaseError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),
}

/// Turns a typed patch into a `$set` of the fields it carries.
pub fn patch_to_update<P: Serialize>(patch: &P) -> Result<Update, StoreError> {
    match serde_json::to_value(patch)? {
        Value::Object(fields) => Ok(Update::set_fields(fields)?),
        other => Err(StoreError::InvalidDocument(format!("patch must be an object, got {}", other))),
    }
}
