pub mod index;
pub mod manager;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::config::ConfigError;
use crate::filter::{FieldPath, Filter, FilterError, Update};
use crate::models::InvalidId;

pub use index::{bootstrap, create_indexes};
pub use memory::MemoryStore;
pub use postgres::PgStore;

pub const USERS: &str = "users";
pub const HOSPITALS: &str = "hospitals";
pub const DOCTORS: &str = "doctors";
pub const APPOINTMENTS: &str = "appointments";

pub const COLLECTIONS: &[&str] = &[USERS, HOSPITALS, DOCTORS, APPOINTMENTS];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    InvalidId(#[from] InvalidId),

    #[error("could not find {0}")]
    NotFound(&'static str),

    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Invalid collection name: {0}")]
    InvalidCollection(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("failed to decode document: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateResult {
    pub matched: u64,
    pub modified: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Ascending,
    /// GeoJSON point stored at the key path.
    Geo2dSphere,
}

#[derive(Debug, Clone)]
pub struct IndexModel {
    pub name: String,
    pub keys: Vec<(FieldPath, IndexKind)>,
    pub unique: bool,
}

impl IndexModel {
    pub fn unique(name: &str, field: &str) -> Result<Self, StoreError> {
        Ok(Self { name: name.to_string(), keys: vec![(FieldPath::parse(field)?, IndexKind::Ascending)], unique: true })
    }

    pub fn geo(name: &str, field: &str) -> Result<Self, StoreError> {
        Ok(Self { name: name.to_string(), keys: vec![(FieldPath::parse(field)?, IndexKind::Geo2dSphere)], unique: false })
    }
}

/// Generic JSON document collections addressed by name.
///
/// Documents are JSON objects carrying a string `_id`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn create_collection(&self, collection: &str) -> Result<(), StoreError>;

    async fn insert_one(&self, collection: &str, doc: Value) -> Result<(), StoreError>;

    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>, StoreError>;

    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Value>, StoreError>;

    /// Updates the first matching document.
    async fn update_one(&self, collection: &str, filter: &Filter, update: &Update) -> Result<UpdateResult, StoreError>;

    /// Updates the first matching document and returns it as it is after the update.
    async fn find_one_and_update(&self, collection: &str, filter: &Filter, update: &Update) -> Result<Option<Value>, StoreError>;

    /// Deletes the first matching document; returns the deleted count.
    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError>;

    async fn create_index(&self, collection: &str, index: &IndexModel) -> Result<(), StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

pub(crate) fn validate_collection_name(name: &str) -> Result<(), StoreError> {
    let valid = name.chars().next().map_or(false, |c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid { Ok(()) } else { Err(StoreError::InvalidCollection(name.to_string())) }
}

pub(crate) fn document_id(doc: &Value) -> Result<&str, StoreError> {
    if !doc.is_object() {
        return Err(StoreError::InvalidDocument("document must be an object".to_string()));
    }
    doc.get("_id")
        .and_then(Value::as_str)
        .ok_or_else(|| StoreError::InvalidDocument("document requires a string _id".to_string()))
}
