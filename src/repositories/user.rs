use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

use super::{by_id, Collection};
use crate::database::{DocumentStore, StoreError, USERS};
use crate::filter::{Filter, Update};
use crate::models::{DocumentId, NewUser, User};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn register_user(&self, user: NewUser) -> Result<User, StoreError>;
    async fn get_users_by_query(&self, filter: &Filter) -> Result<Vec<User>, StoreError>;
    async fn get_user_by_id(&self, id: &str) -> Result<User, StoreError>;
    /// Fails with `NotFound` when no user has `id`.
    async fn update_user_by_id(&self, id: &str, update: Update) -> Result<(), StoreError>;
    async fn delete_user_by_id(&self, id: &str) -> Result<u64, StoreError>;
}

pub struct StoreUserRepository {
    users: Collection<User>,
}

impl StoreUserRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { users: Collection::new(USERS, store) }
    }
}

#[async_trait]
impl UserRepository for StoreUserRepository {
    async fn register_user(&self, user: NewUser) -> Result<User, StoreError> {
        let now = Utc::now();
        let user = User {
            id: DocumentId::new(),
            firstname: user.firstname,
            lastname: user.lastname,
            email: user.email,
            password: user.password,
            roles: user.roles,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(&user).await?;
        debug!("registered user {}", user.id);
        Ok(user)
    }

    async fn get_users_by_query(&self, filter: &Filter) -> Result<Vec<User>, StoreError> {
        self.users.select_any(filter).await
    }

    async fn get_user_by_id(&self, id: &str) -> Result<User, StoreError> {
        self.users.select_404(&by_id(id)?, "user").await
    }

    async fn update_user_by_id(&self, id: &str, update: Update) -> Result<(), StoreError> {
        let result = self.users.update_one(&by_id(id)?, update).await?;
        if result.matched == 0 {
            return Err(StoreError::NotFound("user"));
        }
        Ok(())
    }

    async fn delete_user_by_id(&self, id: &str) -> Result<u64, StoreError> {
        self.users.delete_one(&by_id(id)?).await
    }
}
