use std::sync::Arc;

use super::{patch_to_update, UsecaseError};
use crate::filter::Filter;
use crate::models::{DocumentId, Hospital, HospitalPatch, HospitalRequest};
use crate::repositories::HospitalRepository;
use crate::validation::Validate;

pub struct HospitalUsecase {
    repo: Arc<dyn HospitalRepository>,
}

impl HospitalUsecase {
    pub fn new(repo: Arc<dyn HospitalRepository>) -> Self {
        Self { repo }
    }

    /// `owner` becomes the hospital's `userId` regardless of the request body.
    pub async fn create_hospital(&self, request: HospitalRequest, owner: DocumentId) -> Result<Hospital, UsecaseError> {
        let hospital = request.into_new_hospital(owner)?;
        Ok(self.repo.create_hospital(hospital).await?)
    }

    pub async fn get_hospital_by_id(&self, id: &str) -> Result<Hospital, UsecaseError> {
        Ok(self.repo.get_hospital_by_id(id).await?)
    }

    pub async fn get_all_hospitals(&self) -> Result<Vec<Hospital>, UsecaseError> {
        Ok(self.repo.get_all_hospitals().await?)
    }

    pub async fn get_hospitals_by_query(&self, filter: &Filter) -> Result<Vec<Hospital>, UsecaseError> {
        Ok(self.repo.get_hospitals_by_query(filter).await?)
    }

    pub async fn update_hospital_by_id(&self, id: &str, patch: HospitalPatch) -> Result<Hospital, UsecaseError> {
        patch.validate()?;
        let update = patch_to_update(&patch)?;
        Ok(self.repo.update_hospital_by_id(id, update).await?)
    }

    pub async fn delete_hospital(&self, id: &str) -> Result<u64, UsecaseError> {
        Ok(self.repo.delete_hospital(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use crate::validation::describe;
    use crate::repositories::StoreHospitalRepository;
    use serde_json::json;

    fn usecase() -> HospitalUsecase {
        HospitalUsecase::new(Arc::new(StoreHospitalRepository::new(Arc::new(MemoryStore::new()))))
    }

    fn request(body: serde_json::Value) -> HospitalRequest {
        serde_json::from_value(body).unwrap()
    }

    fn marina() -> serde_json::Value {
        json!({
            "name": "Marina Clinic",
            "location": {"address": "12 Marina, Lagos", "point": {"type": "Point", "coordinates": [3.3792, 6.5244]}},
            "specialties": ["dentist"],
            "open": true,
            "phone": "+2348012345678",
            "email": "desk@marina.ng"
        })
    }

    #[tokio::test]
    async fn create_forces_owner_and_validates() {
        let usecase = usecase();
        let owner = DocumentId::new();
        let hospital = usecase.create_hospital(request(marina()), owner).await.unwrap();
        assert_eq!(hospital.user_id, owner);

        let mut bad = marina();
        bad["phone"] = json!("08012345678");
        let err = usecase.create_hospital(request(bad), owner).await.unwrap_err();
        assert!(matches!(err, UsecaseError::Validation(e) if describe(&e) == "phone failed on the 'e164' validation"));
    }

    #[tokio::test]
    async fn patch_validates_before_updating() {
        let usecase = usecase();
        let hospital = usecase.create_hospital(request(marina()), DocumentId::new()).await.unwrap();
        let id = hospital.id.to_string();

        let patch = HospitalPatch { name: Some("M".into()), ..Default::default() };
        assert!(matches!(usecase.update_hospital_by_id(&id, patch).await, Err(UsecaseError::Validation(_))));

        let patch = HospitalPatch { open: Some(false), ..Default::default() };
        let after = usecase.update_hospital_by_id(&id, patch).await.unwrap();
        assert!(!after.open);
        assert_eq!(usecase.delete_hospital(&id).await.unwrap(), 1);
    }
}
