use std::sync::Arc;

use super::{patch_to_update, UsecaseError};
use crate::filter::Filter;
use crate::models::{Doctor, DoctorPatch, DoctorRequest};
use crate::repositories::DoctorRepository;
use crate::validation::Validate;

pub struct DoctorUsecase {
    repo: Arc<dyn DoctorRepository>,
}

impl DoctorUsecase {
    pub fn new(repo: Arc<dyn DoctorRepository>) -> Self {
        Self { repo }
    }

    pub async fn create_doctor(&self, request: DoctorRequest) -> Result<Doctor, UsecaseError> {
        let doctor = request.into_new_doctor()?;
        Ok(self.repo.create_doctor(doctor).await?)
    }

    pub async fn find_doctor_by_id(&self, id: &str) -> Result<Doctor, UsecaseError> {
        Ok(self.repo.find_doctor_by_id(id).await?)
    }

    pub async fn find_doctors_by_query(&self, filter: &Filter) -> Result<Vec<Doctor>, UsecaseError> {
        Ok(self.repo.find_doctors_by_query(filter).await?)
    }

    pub async fn get_doctors_by_hospital_id(&self, hospital_id: &str) -> Result<Vec<Doctor>, UsecaseError> {
        Ok(self.repo.get_doctors_by_hospital_id(hospital_id).await?)
    }

    pub async fn update_doctor_by_id(&self, id: &str, patch: DoctorPatch) -> Result<(), UsecaseError> {
        patch.validate()?;
        let update = patch_to_update(&patch)?;
        Ok(self.repo.update_doctor_by_id(id, update).await?)
    }

    pub async fn delete_doctor_by_id(&self, id: &str) -> Result<u64, UsecaseError> {
        Ok(self.repo.delete_doctor_by_id(id).await?)
    }
}
