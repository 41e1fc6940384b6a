use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{InviteStatus, Specialty};
use super::id::DocumentId;
use validator::{Validate, ValidationErrors};

use crate::validation::field_error;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub firstname: String,
    pub lastname: String,
    pub specialties: Vec<Specialty>,
    pub hospital_id: DocumentId,
    /// Set once the invited doctor links an account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<DocumentId>,
    #[serde(default)]
    pub invite_status: InviteStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewDoctor {
    pub firstname: String,
    pub lastname: String,
    pub specialties: Vec<Specialty>,
    pub hospital_id: DocumentId,
    pub user_id: Option<DocumentId>,
    pub invite_status: InviteStatus,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct DoctorRequest {
    #[validate(custom(function = "crate::validation::not_blank"), length(min = 2, max = 100))]
    pub firstname: String,
    #[validate(custom(function = "crate::validation::not_blank"), length(min = 2, max = 100))]
    pub lastname: String,
    #[validate(custom(function = "crate::validation::specialty_names"))]
    pub specialties: Vec<String>,
    #[validate(custom(function = "crate::validation::required_document_id"))]
    pub hospital_id: String,
    #[validate(custom(function = "crate::validation::document_id"))]
    pub user_id: Option<String>,
    #[validate(custom(function = "crate::validation::invite_status"))]
    pub invite_status: Option<String>,
}

impl DoctorRequest {
    pub fn into_new_doctor(self) -> Result<NewDoctor, ValidationErrors> {
        self.validate()?;
        let hospital_id = DocumentId::parse(&self.hospital_id).map_err(|_| field_error("hospitalId", "uuid"))?;
        let user_id = match &self.user_id {
            Some(raw) => Some(DocumentId::parse(raw).map_err(|_| field_error("userId", "uuid"))?),
            None => None,
        };
        Ok(NewDoctor {
            firstname: self.firstname.trim().to_string(),
            lastname: self.lastname.trim().to_string(),
            specialties: self.specialties.iter().filter_map(|s| s.parse().ok()).collect(),
            hospital_id,
            user_id,
            invite_status: self.invite_status.and_then(|s| s.parse().ok()).unwrap_or_default(),
        })
    }
}

/// Partial update for `PATCH /doctors/{id}`. A doctor cannot move hospitals.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DoctorPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "crate::validation::not_blank"), length(min = 2, max = 100))]
    pub firstname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "crate::validation::not_blank"), length(min = 2, max = 100))]
    pub lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "crate::validation::not_empty"))]
    pub specialties: Option<Vec<Specialty>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<DocumentId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invite_status: Option<InviteStatus>,
}
