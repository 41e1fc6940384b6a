use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::Specialty;
use super::id::DocumentId;
use validator::{Validate, ValidationErrors};

use crate::validation::field_error;

/// GeoJSON point, coordinates are `[longitude, latitude]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub address: String,
    pub point: GeoPoint,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hospital {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub name: String,
    pub location: Location,
    pub user_id: DocumentId,
    pub specialties: Vec<Specialty>,
    pub open: bool,
    #[serde(default)]
    pub description: String,
    pub phone: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewHospital {
    pub name: String,
    pub location: Location,
    pub user_id: DocumentId,
    pub specialties: Vec<Specialty>,
    pub open: bool,
    pub description: String,
    pub phone: String,
    pub email: String,
}

/// Body of `POST /hospitals`. The owner comes from the caller's token, so a
/// `userId` in the body is ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct HospitalRequest {
    #[validate(custom(function = "crate::validation::not_blank"), length(min = 2, max = 100))]
    pub name: String,
    #[validate(required, custom(function = "crate::validation::geopoint"))]
    pub location: Option<Location>,
    #[validate(custom(function = "crate::validation::specialty_names"))]
    pub specialties: Vec<String>,
    pub open: bool,
    #[validate(length(max = 1000))]
    pub description: String,
    #[validate(custom(function = "crate::validation::e164"))]
    pub phone: String,
    #[validate(custom(function = "crate::validation::not_blank"), email)]
    pub email: String,
}

impl HospitalRequest {
    pub fn into_new_hospital(self, user_id: DocumentId) -> Result<NewHospital, ValidationErrors> {
        self.validate()?;
        let location = self.location.ok_or_else(|| field_error("location", "required"))?;
        Ok(NewHospital {
            name: self.name.trim().to_string(),
            location,
            user_id,
            specialties: self.specialties.iter().filter_map(|s| s.parse().ok()).collect(),
            open: self.open,
            description: self.description,
            phone: self.phone,
            email: self.email.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HospitalPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "crate::validation::not_blank"), length(min = 2, max = 100))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "crate::validation::geopoint"))]
    pub location: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "crate::validation::not_empty"))]
    pub specialties: Option<Vec<Specialty>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "crate::validation::e164"))]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,
}
