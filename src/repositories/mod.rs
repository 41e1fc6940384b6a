pub mod appointment;
pub mod doctor;
pub mod hospital;
pub mod user;

use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

use crate::database::{DocumentStore, StoreError, UpdateResult};
use crate::filter::{Filter, Update};
use crate::models::DocumentId;

pub use appointment::{AppointmentRepository, StoreAppointmentRepository};
pub use doctor::{DoctorRepository, StoreDoctorRepository};
pub use hospital::{HospitalRepository, StoreHospitalRepository};
pub use user::{StoreUserRepository, UserRepository};

/// Typed view over one document collection.
pub struct Collection<T> {
    name: &'static str,
    store: Arc<dyn DocumentStore>,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    pub fn new(name: &'static str, store: Arc<dyn DocumentStore>) -> Self {
        Self { name, store, _phantom: PhantomData }
    }

    pub async fn insert(&self, doc: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(doc)?;
        debug!("insert into {}", self.name);
        self.store.insert_one(self.name, value).await
    }

    pub async fn select_any(&self, filter: &Filter) -> Result<Vec<T>, StoreError> {
        self.store
            .find(self.name, filter)
            .await?
            .into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(StoreError::from))
            .collect()
    }

    pub async fn select_one(&self, filter: &Filter) -> Result<Option<T>, StoreError> {
        match self.store.find_one(self.name, filter).await? {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    /// Like `select_one`, but a miss is `StoreError::NotFound(what)`.
    pub async fn select_404(&self, filter: &Filter, what: &'static str) -> Result<T, StoreError> {
        self.select_one(filter).await?.ok_or(StoreError::NotFound(what))
    }

    /// Applies `update` plus an `updatedAt` stamp to the first match.
    pub async fn update_one(&self, filter: &Filter, update: Update) -> Result<UpdateResult, StoreError> {
        let update = stamp(update)?;
        debug!("update_one on {}", self.name);
        self.store.update_one(self.name, filter, &update).await
    }

    /// As `update_one`, returning the updated document.
    pub async fn update_and_return(&self, filter: &Filter, update: Update) -> Result<Option<T>, StoreError> {
        let update = stamp(update)?;
        debug!("find_one_and_update on {}", self.name);
        match self.store.find_one_and_update(self.name, filter, &update).await? {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    pub async fn delete_one(&self, filter: &Filter) -> Result<u64, StoreError> {
        debug!("delete_one on {}", self.name);
        self.store.delete_one(self.name, filter).await
    }
}

fn stamp(update: Update) -> Result<Update, StoreError> {
    Ok(update.set("updatedAt", json!(Utc::now()))?)
}

/// `{ "_id": id }`, failing with `InvalidId` before any query runs.
pub fn by_id(id: &str) -> Result<Filter, StoreError> {
    let id = DocumentId::parse(id)?;
    Ok(Filter::new(&json!({ "_id": id }))?)
}

/// `{ field: id }` for foreign-key lookups.
pub fn by_ref(field: &str, id: &str) -> Result<Filter, StoreError> {
    let id = DocumentId::parse(id)?;
    Ok(Filter::new(&json!({ field: id }))?)
}
