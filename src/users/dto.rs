use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo_types::User;
use super::services::AuthSuccess;

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response returned after signup or login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user_id: Uuid,
    pub email: String,
    pub token: String,
}

impl From<AuthSuccess> for AuthResponse {
    fn from(out: AuthSuccess) -> Self {
        Self {
            user_id: out.user_id,
            email: out.email,
            token: out.token,
        }
    }
}

/// Public projection of a user. There is no password field here to leak.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: String,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            image: user.avatar_key,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<UserSummary>,
}
