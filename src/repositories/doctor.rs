use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

use super::{by_id, by_ref, Collection};
use crate::database::{DocumentStore, StoreError, DOCTORS};
use crate::filter::{Filter, Update};
use crate::models::{Doctor, DocumentId, NewDoctor};

#[async_trait]
pub trait DoctorRepository: Send + Sync {
    async fn create_doctor(&self, doctor: NewDoctor) -> Result<Doctor, StoreError>;
    async fn find_doctor_by_id(&self, id: &str) -> Result<Doctor, StoreError>;
    async fn find_doctors_by_query(&self, filter: &Filter) -> Result<Vec<Doctor>, StoreError>;
    async fn get_doctors_by_hospital_id(&self, hospital_id: &str) -> Result<Vec<Doctor>, StoreError>;
    async fn update_doctor_by_id(&self, id: &str, update: Update) -> Result<(), StoreError>;
    async fn delete_doctor_by_id(&self, id: &str) -> Result<u64, StoreError>;
}

pub struct StoreDoctorRepository {
    doctors: Collection<Doctor>,
}

impl StoreDoctorRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { doctors: Collection::new(DOCTORS, store) }
    }
}

#[async_trait]
impl DoctorRepository for StoreDoctorRepository {
    async fn create_doctor(&self, doctor: NewDoctor) -> Result<Doctor, StoreError> {
        let now = Utc::now();
        let doctor = Doctor {
            id: DocumentId::new(),
            firstname: doctor.firstname,
            lastname: doctor.lastname,
            specialties: doctor.specialties,
            hospital_id: doctor.hospital_id,
            user_id: doctor.user_id,
            invite_status: doctor.invite_status,
            created_at: now,
            updated_at: now,
        };
        self.doctors.insert(&doctor).await?;
        Ok(doctor)
    }

    async fn find_doctor_by_id(&self, id: &str) -> Result<Doctor, StoreError> {
        self.doctors.select_404(&by_id(id)?, "doctor").await
    }

    async fn find_doctors_by_query(&self, filter: &Filter) -> Result<Vec<Doctor>, StoreError> {
        self.doctors.select_any(filter).await
    }

    async fn get_doctors_by_hospital_id(&self, hospital_id: &str) -> Result<Vec<Doctor>, StoreError> {
        self.doctors.select_any(&by_ref("hospitalId", hospital_id)?).await
    }

    async fn update_doctor_by_id(&self, id: &str, update: Update) -> Result<(), StoreError> {
        let result = self.doctors.update_one(&by_id(id)?, update).await?;
        if result.matched == 0 {
            return Err(StoreError::NotFound("doctor"));
        }
        Ok(())
    }

    async fn delete_doctor_by_id(&self, id: &str) -> Result<u64, StoreError> {
        self.doctors.delete_one(&by_id(id)?).await
    }
}
