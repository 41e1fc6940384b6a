use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::Role;
use super::id::DocumentId;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    /// Argon2 PHC string, never the plain password.
    pub password: String,
    #[serde(default)]
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            firstname: user.firstname,
            lastname: user.lastname,
            email: user.email,
            roles: user.roles,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Fields for a user about to be inserted. `password` is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
    pub roles: Vec<Role>,
}

/// Body of `POST /users`. Only `customer` and `doctor` may be self-assigned;
/// other roles are granted by the server.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterUserRequest {
    #[validate(custom(function = "crate::validation::not_blank"), length(min = 2, max = 100))]
    pub firstname: String,
    #[validate(custom(function = "crate::validation::not_blank"), length(min = 2, max = 100))]
    pub lastname: String,
    #[validate(custom(function = "crate::validation::not_blank"), email)]
    pub email: String,
    #[validate(custom(function = "crate::validation::not_blank"), length(min = 6))]
    pub password: String,
    #[validate(custom(function = "crate::validation::registration_roles"))]
    pub roles: Vec<String>,
}

impl RegisterUserRequest {
    /// Converts a validated request; the password is still plain text here.
    pub fn into_new_user(self) -> NewUser {
        NewUser {
            firstname: self.firstname.trim().to_string(),
            lastname: self.lastname.trim().to_string(),
            email: normalize_email(&self.email),
            password: self.password,
            roles: self.roles.iter().filter_map(|r| r.parse().ok()).collect(),
        }
    }
}

/// E-mail addresses are stored and looked up trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    #[validate(custom(function = "crate::validation::not_blank"), email)]
    pub email: String,
    #[validate(custom(function = "crate::validation::not_blank"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: PublicUser,
    pub token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct RefreshRequest {
    #[validate(custom(function = "crate::validation::not_blank"))]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Partial update accepted by `PATCH /users/{id}`. Roles are granted
/// through dedicated flows, never patched directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "crate::validation::not_blank"), length(min = 2, max = 100))]
    pub firstname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "crate::validation::not_blank"), length(min = 2, max = 100))]
    pub lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "crate::validation::not_blank"), email)]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "crate::validation::not_blank"), length(min = 6))]
    pub password: Option<String>,
}
