use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

use super::{by_id, Collection};
use crate::database::{DocumentStore, StoreError, HOSPITALS};
use crate::filter::{Filter, Update};
use crate::models::{DocumentId, Hospital, NewHospital};

#[async_trait]
pub trait HospitalRepository: Send + Sync {
    async fn create_hospital(&self, hospital: NewHospital) -> Result<Hospital, StoreError>;
    async fn get_hospital_by_id(&self, id: &str) -> Result<Hospital, StoreError>;
    async fn get_all_hospitals(&self) -> Result<Vec<Hospital>, StoreError>;
    async fn get_hospitals_by_query(&self, filter: &Filter) -> Result<Vec<Hospital>, StoreError>;
    /// Returns the hospital as it reads after the update.
    async fn update_hospital_by_id(&self, id: &str, update: Update) -> Result<Hospital, StoreError>;
    async fn delete_hospital(&self, id: &str) -> Result<u64, StoreError>;
}

pub struct StoreHospitalRepository {
    hospitals: Collection<Hospital>,
}

impl StoreHospitalRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { hospitals: Collection::new(HOSPITALS, store) }
    }
}

#[async_trait]
impl HospitalRepository for StoreHospitalRepository {
    async fn create_hospital(&self, hospital: NewHospital) -> Result<Hospital, StoreError> {
        let now = Utc::now();
        let hospital = Hospital {
            id: DocumentId::new(),
            name: hospital.name,
            location: hospital.location,
            user_id: hospital.user_id,
            specialties: hospital.specialties,
            open: hospital.open,
            description: hospital.description,
            phone: hospital.phone,
            email: hospital.email,
            created_at: now,
            updated_at: now,
        };
        self.hospitals.insert(&hospital).await?;
        Ok(hospital)
    }

    async fn get_hospital_by_id(&self, id: &str) -> Result<Hospital, StoreError> {
        self.hospitals.select_404(&by_id(id)?, "hospital").await
    }

    async fn get_all_hospitals(&self) -> Result<Vec<Hospital>, StoreError> {
        self.hospitals.select_any(&Filter::all()).await
    }

    async fn get_hospitals_by_query(&self, filter: &Filter) -> Result<Vec<Hospital>, StoreError> {
        self.hospitals.select_any(filter).await
    }

    async fn update_hospital_by_id(&self, id: &str, update: Update) -> Result<Hospital, StoreError> {
        self.hospitals
            .update_and_return(&by_id(id)?, update)
            .await?
            .ok_or(StoreError::NotFound("hospital"))
    }

    async fn delete_hospital(&self, id: &str) -> Result<u64, StoreError> {
        self.hospitals.delete_one(&by_id(id)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use crate::models::{GeoPoint, Location, Specialty};
    use serde_json::json;

    fn new_hospital(name: &str, specialties: Vec<Specialty>) -> NewHospital {
        NewHospital {
            name: name.into(),
            location: Location {
                address: "12 Marina, Lagos".into(),
                point: GeoPoint { kind: "Point".into(), coordinates: vec![3.3792, 6.5244] },
            },
            user_id: DocumentId::new(),
            specialties,
            open: true,
            description: String::new(),
            phone: "+2348012345678".into(),
            email: "desk@marina.ng".into(),
        }
    }

    #[tokio::test]
    async fn query_by_specialty_matches_array_members() {
        let repo = StoreHospitalRepository::new(Arc::new(MemoryStore::new()));
        repo.create_hospital(new_hospital("Marina", vec![Specialty::Dentist, Specialty::Surgeon])).await.unwrap();
        repo.create_hospital(new_hospital("Ikoyi", vec![Specialty::Pediatrician])).await.unwrap();

        assert_eq!(repo.get_all_hospitals().await.unwrap().len(), 2);
        let dentists = repo
            .get_hospitals_by_query(&Filter::new(&json!({"specialties": "dentist"})).unwrap())
            .await
            .unwrap();
        assert_eq!(dentists.len(), 1);
        assert_eq!(dentists[0].name, "Marina");
    }

    #[tokio::test]
    async fn update_returns_after_image() {
        let repo = StoreHospitalRepository::new(Arc::new(MemoryStore::new()));
        let hospital = repo.create_hospital(new_hospital("Marina", vec![Specialty::Dentist])).await.unwrap();
        let id = hospital.id.to_string();

        let update = Update::default().set("open", json!(false)).unwrap();
        let after = repo.update_hospital_by_id(&id, update).await.unwrap();
        assert!(!after.open);
        assert_eq!(after.name, "Marina");

        let missing = DocumentId::new().to_string();
        let update = Update::default().set("open", json!(true)).unwrap();
        assert!(matches!(
            repo.update_hospital_by_id(&missing, update).await,
            Err(StoreError::NotFound("hospital"))
        ));

        assert_eq!(repo.delete_hospital(&id).await.unwrap(), 1);
        assert_eq!(repo.delete_hospital(&id).await.unwrap(), 0);
    }
}
