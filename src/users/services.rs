use axum::extract::FromRef;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::jwt::TokenKeys;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{ApiError, CredentialFault};
use crate::state::AppState;
use crate::users::repo::StoreError;
use crate::users::repo_types::{NewUser, User};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug)]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Storage key of the avatar, already durably stored by the upload
    /// stage before the account flow runs.
    pub avatar_key: String,
}

/// What a successful signup or login hands back to the client.
#[derive(Debug)]
pub struct AuthSuccess {
    pub user_id: Uuid,
    pub email: String,
    pub token: String,
}

pub async fn signup(state: &AppState, input: SignupInput) -> Result<AuthSuccess, ApiError> {
    let name = input.name.trim();
    let email = input.email.trim().to_lowercase();

    if name.is_empty()
        || !is_valid_email(&email)
        || input.password.len() < MIN_PASSWORD_LEN
        || input.avatar_key.is_empty()
    {
        warn!("signup payload failed validation");
        return Err(ApiError::Validation);
    }

    let existing = state
        .users
        .find_by_email(&email)
        .await
        .map_err(|e| ApiError::StoreUnavailable {
            message: "Signing up failed, please try again later",
            source: e,
        })?;
    if existing.is_some() {
        warn!(%email, "signup for existing account");
        return Err(ApiError::DuplicateAccount);
    }

    let password_hash = hash_password(&input.password).map_err(ApiError::HashingUnavailable)?;

    // The pre-check above is only the friendly fast path; a racing signup
    // loses at the unique index and is reported the same way.
    let user = match state
        .users
        .insert(NewUser {
            name: name.to_string(),
            email,
            password_hash,
            avatar_key: input.avatar_key,
        })
        .await
    {
        Ok(user) => user,
        Err(StoreError::DuplicateEmail) => return Err(ApiError::DuplicateAccount),
        Err(e) => return Err(ApiError::AccountCreationFailed(e.into())),
    };

    // The account is not usable without a token, so a signing failure here
    // fails the whole signup.
    let keys = TokenKeys::from_ref(state);
    let token = keys
        .sign(user.id, &user.email)
        .map_err(|e| ApiError::AccountCreationFailed(e.into()))?;

    info!(user_id = %user.id, email = %user.email, "user signed up");
    Ok(AuthSuccess {
        user_id: user.id,
        email: user.email,
        token,
    })
}

pub async fn login(state: &AppState, email: &str, password: &str) -> Result<AuthSuccess, ApiError> {
    let email = email.trim().to_lowercase();

    let user = state
        .users
        .find_by_email(&email)
        .await
        .map_err(|e| ApiError::StoreUnavailable {
            message: "Logging in failed, please try again later",
            source: e,
        })?
        .ok_or(ApiError::InvalidCredentials(CredentialFault::UnknownEmail))?;

    let ok = verify_password(password, &user.password_hash)
        .map_err(ApiError::CredentialCheckFailed)?;
    if !ok {
        return Err(ApiError::InvalidCredentials(CredentialFault::WrongPassword));
    }

    let keys = TokenKeys::from_ref(state);
    let token = keys.sign(user.id, &user.email).map_err(ApiError::AuthFailed)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(AuthSuccess {
        user_id: user.id,
        email: user.email,
        token,
    })
}

pub async fn list_users(state: &AppState) -> Result<Vec<User>, ApiError> {
    state
        .users
        .list()
        .await
        .map_err(|e| ApiError::StoreUnavailable {
            message: "Fetching users failed, please try again later.",
            source: e,
        })
}
