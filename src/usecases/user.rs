use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use super::{patch_to_update, UsecaseError};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::{JwtKeys, TokenKind};
use crate::database::StoreError;
use crate::filter::{Filter, Update};
use crate::models::user::normalize_email;
use crate::models::{
    DocumentId, LoginRequest, LoginResponse, RegisterUserRequest, Role, TokenResponse, User, UserPatch,
};
use crate::repositories::UserRepository;
use crate::validation::Validate;

pub struct UserUsecase {
    repo: Arc<dyn UserRepository>,
    jwt: Arc<JwtKeys>,
}

impl UserUsecase {
    pub fn new(repo: Arc<dyn UserRepository>, jwt: Arc<JwtKeys>) -> Self {
        Self { repo, jwt }
    }

    /// Validates, defaults the role to `customer` and stores an Argon2 hash.
    pub async fn register_user(&self, request: RegisterUserRequest) -> Result<User, UsecaseError> {
        request.validate()?;
        let mut new_user = request.into_new_user();
        if new_user.roles.is_empty() {
            new_user.roles.push(Role::Customer);
        }
        new_user.password = hash_password(&new_user.password)?;

        let user = self.repo.register_user(new_user).await.map_err(email_conflict)?;
        info!("Registered user {}", user.id);
        Ok(user)
    }

    pub async fn login_user(&self, request: LoginRequest) -> Result<LoginResponse, UsecaseError> {
        request.validate()?;
        let email = normalize_email(&request.email);
        let filter = Filter::new(&json!({ "email": email })).map_err(StoreError::from)?;

        let Some(user) = self.repo.get_users_by_query(&filter).await?.into_iter().next() else {
            warn!("Login rejected: unknown email");
            return Err(UsecaseError::Unauthorized("user with email doesn't exist".to_string()));
        };
        if !verify_password(&request.password, &user.password)? {
            warn!("Login rejected: wrong password for user {}", user.id);
            return Err(UsecaseError::Unauthorized("check email and password".to_string()));
        }

        let token = self.jwt.generate_token(&user, TokenKind::Access)?;
        let refresh_token = self.jwt.generate_token(&user, TokenKind::Refresh)?;
        Ok(LoginResponse { user: user.into(), token, refresh_token })
    }

    /// Exchanges a refresh token for a fresh access token.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse, UsecaseError> {
        let claims = self.jwt.validate_kind(refresh_token, TokenKind::Refresh)?;
        let user = match self.repo.get_user_by_id(&claims.userid.to_string()).await {
            Ok(user) => user,
            Err(StoreError::NotFound(_)) => {
                return Err(UsecaseError::Unauthorized("user no longer exists".to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        let token = self.jwt.generate_token(&user, TokenKind::Access)?;
        Ok(TokenResponse { token })
    }

    pub async fn get_users_by_query(&self, filter: &Filter) -> Result<Vec<User>, UsecaseError> {
        Ok(self.repo.get_users_by_query(filter).await?)
    }

    pub async fn get_user_by_id(&self, id: &str) -> Result<User, UsecaseError> {
        Ok(self.repo.get_user_by_id(id).await?)
    }

    /// A new password in the patch is hashed before it is stored.
    pub async fn update_user_by_id(&self, id: &str, mut patch: UserPatch) -> Result<(), UsecaseError> {
        patch.validate()?;
        patch.email = patch.email.as_deref().map(normalize_email);
        if let Some(password) = patch.password.take() {
            patch.password = Some(hash_password(&password)?);
        }
        let update = patch_to_update(&patch)?;
        self.repo.update_user_by_id(id, update).await.map_err(email_conflict)
    }

    pub async fn delete_user_by_id(&self, id: &str) -> Result<u64, UsecaseError> {
        Ok(self.repo.delete_user_by_id(id).await?)
    }

    pub async fn grant_role(&self, id: &DocumentId, role: Role) -> Result<(), UsecaseError> {
        let update = Update::default().add_to_set("roles", json!(role)).map_err(StoreError::from)?;
        self.repo.update_user_by_id(&id.to_string(), update).await?;
        info!("Granted role {} to user {}", role, id);
        Ok(())
    }

    /// Operator path for roles that cannot be self-assigned, such as `admin`.
    pub async fn grant_role_by_email(&self, email: &str, role: Role) -> Result<User, UsecaseError> {
        let filter = Filter::new(&json!({ "email": normalize_email(email) })).map_err(StoreError::from)?;
        let Some(user) = self.repo.get_users_by_query(&filter).await?.into_iter().next() else {
            return Err(UsecaseError::NotFound(format!("no user with email {}", email)));
        };
        self.grant_role(&user.id, role).await?;
        Ok(self.repo.get_user_by_id(&user.id.to_string()).await?)
    }

    /// Loads `id` and fails with `Forbidden` unless it holds one of `roles`.
    pub async fn require_role(&self, id: &DocumentId, roles: &[Role]) -> Result<User, UsecaseError> {
        let user = match self.repo.get_user_by_id(&id.to_string()).await {
            Ok(user) => user,
            Err(StoreError::NotFound(_)) => return Err(UsecaseError::Forbidden("insufficient role".to_string())),
            Err(e) => return Err(e.into()),
        };
        if !Role::any_of(roles, &user.roles) {
            return Err(UsecaseError::Forbidden("insufficient role".to_string()));
        }
        Ok(user)
    }
}

fn email_conflict(err: StoreError) -> UsecaseError {
    match err {
        StoreError::DuplicateKey(_) => UsecaseError::Conflict("user with email already exists".to_string()),
        other => other.into(),
    }
}
