use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

use super::{by_id, by_ref, Collection};
use crate::database::{DocumentStore, StoreError, APPOINTMENTS};
use crate::filter::{Filter, Update};
use crate::models::{Appointment, DocumentId, NewAppointment};

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn create_appointment(&self, appointment: NewAppointment) -> Result<Appointment, StoreError>;
    async fn get_single_appointment_by_id(&self, id: &str) -> Result<Appointment, StoreError>;
    async fn get_appointments_by_doctor_id(&self, doctor_id: &str) -> Result<Vec<Appointment>, StoreError>;
    async fn get_appointments_by_user_id(&self, user_id: &str) -> Result<Vec<Appointment>, StoreError>;
    async fn get_appointments_by_query(&self, filter: &Filter) -> Result<Vec<Appointment>, StoreError>;
    async fn update_appointment_by_id(&self, id: &str, update: Update) -> Result<Appointment, StoreError>;
    async fn delete_appointment_by_id(&self, id: &str) -> Result<u64, StoreError>;
}

pub struct StoreAppointmentRepository {
    appointments: Collection<Appointment>,
}

impl StoreAppointmentRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { appointments: Collection::new(APPOINTMENTS, store) }
    }
}

#[async_trait]
impl AppointmentRepository for StoreAppointmentRepository {
    async fn create_appointment(&self, appointment: NewAppointment) -> Result<Appointment, StoreError> {
        let now = Utc::now();
        let appointment = Appointment {
            id: DocumentId::new(),
            hospital_id: appointment.hospital_id,
            user_id: appointment.user_id,
            doctor_id: appointment.doctor_id,
            status: appointment.status,
            reason: appointment.reason,
            created_at: now,
            updated_at: now,
        };
        self.appointments.insert(&appointment).await?;
        Ok(appointment)
    }

    async fn get_single_appointment_by_id(&self, id: &str) -> Result<Appointment, StoreError> {
        self.appointments.select_404(&by_id(id)?, "appointment").await
    }

    async fn get_appointments_by_doctor_id(&self, doctor_id: &str) -> Result<Vec<Appointment>, StoreError> {
        self.appointments.select_any(&by_ref("doctorId", doctor_id)?).await
    }

    async fn get_appointments_by_user_id(&self, user_id: &str) -> Result<Vec<Appointment>, StoreError> {
        self.appointments.select_any(&by_ref("userId", user_id)?).await
    }

    async fn get_appointments_by_query(&self, filter: &Filter) -> Result<Vec<Appointment>, StoreError> {
        self.appointments.select_any(filter).await
    }

    async fn update_appointment_by_id(&self, id: &str, update: Update) -> Result<Appointment, StoreError> {
        self.appointments
            .update_and_return(&by_id(id)?, update)
            .await?
            .ok_or(StoreError::NotFound("appointment"))
    }

    async fn delete_appointment_by_id(&self, id: &str) -> Result<u64, StoreError> {
        self.appointments.delete_one(&by_id(id)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use crate::models::AppointmentStatus;
    use serde_json::json;

    fn booking(user_id: DocumentId, doctor_id: DocumentId) -> NewAppointment {
        NewAppointment {
            hospital_id: DocumentId::new(),
            user_id,
            doctor_id,
            status: AppointmentStatus::Waiting,
            reason: "chest pains".into(),
        }
    }

    #[tokio::test]
    async fn lookups_use_foreign_keys() {
        let repo = StoreAppointmentRepository::new(Arc::new(MemoryStore::new()));
        let (ada, bola) = (DocumentId::new(), DocumentId::new());
        let doctor = DocumentId::new();
        let first = repo.create_appointment(booking(ada, doctor)).await.unwrap();
        repo.create_appointment(booking(bola, doctor)).await.unwrap();
        repo.create_appointment(booking(ada, DocumentId::new())).await.unwrap();

        assert_eq!(repo.get_appointments_by_doctor_id(&doctor.to_string()).await.unwrap().len(), 2);
        assert_eq!(repo.get_appointments_by_user_id(&ada.to_string()).await.unwrap().len(), 2);
        assert!(repo.get_appointments_by_doctor_id(&first.id.to_string()).await.unwrap().is_empty());

        let waiting = repo
            .get_appointments_by_query(&Filter::new(&json!({"status": "waiting"})).unwrap())
            .await
            .unwrap();
        assert_eq!(waiting.len(), 3);
    }

    #[tokio::test]
    async fn status_update_returns_after_image() {
        let repo = StoreAppointmentRepository::new(Arc::new(MemoryStore::new()));
        let appointment = repo.create_appointment(booking(DocumentId::new(), DocumentId::new())).await.unwrap();
        let id = appointment.id.to_string();

        let update = Update::default().set("status", json!("ongoing")).unwrap();
        let after = repo.update_appointment_by_id(&id, update).await.unwrap();
        assert_eq!(after.status, AppointmentStatus::Ongoing);
        assert_eq!(repo.get_single_appointment_by_id(&id).await.unwrap().status, AppointmentStatus::Ongoing);

        assert_eq!(repo.delete_appointment_by_id(&id).await.unwrap(), 1);
        assert!(matches!(
            repo.get_single_appointment_by_id(&id).await,
            Err(StoreError::NotFound("appointment"))
        ));
    }
}
