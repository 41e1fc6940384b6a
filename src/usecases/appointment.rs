use std::sync::Arc;

use super::{patch_to_update, UsecaseError};
use crate::filter::Filter;
use crate::models::{Appointment, AppointmentPatch, AppointmentRequest, DocumentId};
use crate::repositories::AppointmentRepository;
use crate::validation::Validate;

pub struct AppointmentUsecase {
    repo: Arc<dyn AppointmentRepository>,
}

impl AppointmentUsecase {
    pub fn new(repo: Arc<dyn AppointmentRepository>) -> Self {
        Self { repo }
    }

    /// Books on behalf of `user_id`; the appointment starts out `waiting`.
    pub async fn create_appointment(&self, request: AppointmentRequest, user_id: DocumentId) -> Result<Appointment, UsecaseError> {
        let appointment = request.into_new_appointment(user_id)?;
        Ok(self.repo.create_appointment(appointment).await?)
    }

    pub async fn get_single_appointment_by_id(&self, id: &str) -> Result<Appointment, UsecaseError> {
        Ok(self.repo.get_single_appointment_by_id(id).await?)
    }

    pub async fn get_appointments_by_doctor_id(&self, doctor_id: &str) -> Result<Vec<Appointment>, UsecaseError> {
        Ok(self.repo.get_appointments_by_doctor_id(doctor_id).await?)
    }

    pub async fn get_appointments_by_user_id(&self, user_id: &str) -> Result<Vec<Appointment>, UsecaseError> {
        Ok(self.repo.get_appointments_by_user_id(user_id).await?)
    }

    pub async fn get_appointments_by_query(&self, filter: &Filter) -> Result<Vec<Appointment>, UsecaseError> {
        Ok(self.repo.get_appointments_by_query(filter).await?)
    }

    pub async fn update_appointment_by_id(&self, id: &str, patch: AppointmentPatch) -> Result<Appointment, UsecaseError> {
        patch.validate()?;
        let update = patch_to_update(&patch)?;
        Ok(self.repo.update_appointment_by_id(id, update).await?)
    }

    pub async fn delete_appointment_by_id(&self, id: &str) -> Result<u64, UsecaseError> {
        Ok(self.repo.delete_appointment_by_id(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use crate::models::AppointmentStatus;
    use crate::repositories::StoreAppointmentRepository;
    use serde_json::json;

    #[tokio::test]
    async fn booking_lifecycle() {
        let usecase = AppointmentUsecase::new(Arc::new(StoreAppointmentRepository::new(Arc::new(MemoryStore::new()))));
        let patient = DocumentId::new();
        let doctor = DocumentId::new();
        let request: AppointmentRequest = serde_json::from_value(json!({
            "hospitalId": DocumentId::new().to_string(),
            "doctorId": doctor.to_string(),
            "reason": "persistent cough"
        }))
        .unwrap();

        let appointment = usecase.create_appointment(request, patient).await.unwrap();
        assert_eq!(appointment.status, AppointmentStatus::Waiting);
        assert_eq!(appointment.user_id, patient);

        let id = appointment.id.to_string();
        let patch = AppointmentPatch { status: Some(AppointmentStatus::Done), ..Default::default() };
        assert_eq!(usecase.update_appointment_by_id(&id, patch).await.unwrap().status, AppointmentStatus::Done);

        let short = AppointmentPatch { reason: Some("ow".into()), ..Default::default() };
        assert!(matches!(usecase.update_appointment_by_id(&id, short).await, Err(UsecaseError::Validation(_))));

        assert_eq!(usecase.get_appointments_by_doctor_id(&doctor.to_string()).await.unwrap().len(), 1);
        assert_eq!(usecase.get_appointments_by_user_id(&patient.to_string()).await.unwrap().len(), 1);
        assert_eq!(usecase.delete_appointment_by_id(&id).await.unwrap(), 1);
    }
}
