use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{document_id, validate_collection_name, DocumentStore, IndexKind, IndexModel, StoreError, UpdateResult};
use crate::filter::{evaluate, Filter, Update};

#[derive(Debug, Default)]
struct Collection {
    docs: Vec<Value>,
    indexes: Vec<IndexModel>,
}

impl Collection {
    /// Rejects `candidate` when it collides with another document on `_id`
    /// or on a unique index. `skip` is the candidate's own position.
    fn check_unique(&self, candidate: &Value, skip: Option<usize>) -> Result<(), StoreError> {
        let others: Vec<&Value> =
            self.docs.iter().enumerate().filter(|(i, _)| Some(*i) != skip).map(|(_, d)| d).collect();

        let id = candidate.get("_id");
        if others.iter().any(|other| other.get("_id") == id) {
            return Err(StoreError::DuplicateKey("_id".to_string()));
        }

        for index in self.indexes.iter().filter(|i| i.unique) {
            let key = |doc: &Value| -> Vec<Option<Value>> {
                index.keys.iter().map(|(path, _)| evaluate::resolve(doc, path).cloned()).collect()
            };
            let candidate_key = key(candidate);
            if candidate_key.iter().all(Option::is_none) {
                continue;
            }
            if others.iter().any(|other| key(*other) == candidate_key) {
                return Err(StoreError::DuplicateKey(index.name.clone()));
            }
        }
        Ok(())
    }

    fn position(&self, filter: &Filter) -> Option<usize> {
        self.docs.iter().position(|doc| filter.matches(doc))
    }
}

/// In-process document store with the same semantics as [`super::PgStore`].
/// Collections are created implicitly on first insert.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn update_first(&self, collection: &str, filter: &Filter, update: &Update) -> Result<Option<(Value, bool)>, StoreError> {
        validate_collection_name(collection)?;
        let mut collections = self.collections.write().await;
        let Some(coll) = collections.get_mut(collection) else { return Ok(None) };
        let Some(pos) = coll.position(filter) else { return Ok(None) };

        let mut updated = coll.docs[pos].clone();
        let modified = update.apply(&mut updated);
        if modified {
            coll.check_unique(&updated, Some(pos))?;
            coll.docs[pos] = updated.clone();
        }
        Ok(Some((updated, modified)))
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create_collection(&self, collection: &str) -> Result<(), StoreError> {
        validate_collection_name(collection)?;
        self.collections.write().await.entry(collection.to_string()).or_default();
        Ok(())
    }

    async fn insert_one(&self, collection: &str, doc: Value) -> Result<(), StoreError> {
        validate_collection_name(collection)?;
        document_id(&doc)?;
        let mut collections = self.collections.write().await;
        let coll = collections.entry(collection.to_string()).or_default();
        coll.check_unique(&doc, None)?;
        coll.docs.push(doc);
        Ok(())
    }

    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>, StoreError> {
        validate_collection_name(collection)?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|c| c.docs.iter().filter(|d| filter.matches(d)).cloned().collect())
            .unwrap_or_default())
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Value>, StoreError> {
        validate_collection_name(collection)?;
        let collections = self.collections.read().await;
        Ok(collections.get(collection).and_then(|c| c.docs.iter().find(|d| filter.matches(d)).cloned()))
    }

    async fn update_one(&self, collection: &str, filter: &Filter, update: &Update) -> Result<UpdateResult, StoreError> {
        Ok(match self.update_first(collection, filter, update).await? {
            Some((_, modified)) => UpdateResult { matched: 1, modified: u64::from(modified) },
            None => UpdateResult::default(),
        })
    }

    async fn find_one_and_update(&self, collection: &str, filter: &Filter, update: &Update) -> Result<Option<Value>, StoreError> {
        Ok(self.update_first(collection, filter, update).await?.map(|(doc, _)| doc))
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        validate_collection_name(collection)?;
        let mut collections = self.collections.write().await;
        let Some(coll) = collections.get_mut(collection) else { return Ok(0) };
        match coll.position(filter) {
            Some(pos) => {
                coll.docs.remove(pos);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn create_index(&self, collection: &str, index: &IndexModel) -> Result<(), StoreError> {
        validate_collection_name(collection)?;
        validate_collection_name(&index.name)?;
        if index.keys.iter().any(|(_, kind)| *kind == IndexKind::Geo2dSphere) && index.unique {
            return Err(StoreError::InvalidDocument("geo indexes cannot be unique".to_string()));
        }

        let mut collections = self.collections.write().await;
        let coll = collections.entry(collection.to_string()).or_default();
        if coll.indexes.iter().any(|i| i.name == index.name) {
            return Ok(());
        }
        coll.indexes.push(index.clone());
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
