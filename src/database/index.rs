use tracing::{info, warn};

use super::{DocumentStore, IndexModel, StoreError, COLLECTIONS, HOSPITALS, USERS};

/// Indexes every deployment needs: unique user e-mail and a geospatial index
/// over hospital locations.
pub fn default_indexes() -> Result<Vec<(&'static str, IndexModel)>, StoreError> {
    Ok(vec![
        (USERS, IndexModel::unique("unique_email_idx", "email")?),
        (HOSPITALS, IndexModel::geo("location_point_idx", "location.point")?),
    ])
}

/// Creates the default indexes. Individual failures are logged and skipped.
pub async fn create_indexes(store: &dyn DocumentStore) -> Result<(), StoreError> {
    for (collection, index) in default_indexes()? {
        match store.create_index(collection, &index).await {
            Ok(()) => info!("Created index {} on {}", index.name, collection),
            Err(e) => warn!("Failed to create index {} on {}: {}", index.name, collection, e),
        }
    }
    Ok(())
}

/// Creates every collection, then the default indexes.
pub async fn bootstrap(store: &dyn DocumentStore) -> Result<(), StoreError> {
    for collection in COLLECTIONS {
        store.create_collection(collection).await?;
    }
    create_indexes(store).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn bootstrap_enables_unique_email() {
        let store = MemoryStore::new();
        bootstrap(&store).await.unwrap();
        // Running twice is harmless.
        bootstrap(&store).await.unwrap();

        store.insert_one(USERS, json!({"_id": "1", "email": "a@b.co"})).await.unwrap();
        let err = store.insert_one(USERS, json!({"_id": "2", "email": "a@b.co"})).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey(name) if name == "unique_email_idx"));
    }

    #[test]
    fn default_index_names() {
        let names: Vec<String> = default_indexes().unwrap().into_iter().map(|(_, i)| i.name).collect();
        assert_eq!(names, vec!["unique_email_idx", "location_point_idx"]);
    }
}
