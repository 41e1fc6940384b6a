use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::AppointmentStatus;
use super::id::DocumentId;
use validator::{Validate, ValidationErrors};

use crate::validation::field_error;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub hospital_id: DocumentId,
    pub user_id: DocumentId,
    pub doctor_id: DocumentId,
    #[serde(default)]
    pub status: AppointmentStatus,
    pub reason: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub hospital_id: DocumentId,
    pub user_id: DocumentId,
    pub doctor_id: DocumentId,
    pub status: AppointmentStatus,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct AppointmentRequest {
    #[validate(custom(function = "crate::validation::required_document_id"))]
    pub hospital_id: String,
    #[validate(custom(function = "crate::validation::required_document_id"))]
    pub doctor_id: String,
    #[validate(custom(function = "crate::validation::not_blank"), length(min = 5, max = 500))]
    pub reason: String,
}

impl AppointmentRequest {
    /// New appointments always start out `waiting`.
    pub fn into_new_appointment(self, user_id: DocumentId) -> Result<NewAppointment, ValidationErrors> {
        self.validate()?;
        Ok(NewAppointment {
            hospital_id: DocumentId::parse(&self.hospital_id).map_err(|_| field_error("hospitalId", "uuid"))?,
            doctor_id: DocumentId::parse(&self.doctor_id).map_err(|_| field_error("doctorId", "uuid"))?,
            user_id,
            status: AppointmentStatus::Waiting,
            reason: self.reason.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AppointmentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "crate::validation::not_blank"), length(min = 5, max = 500))]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<DocumentId>,
}
