use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use tracing::instrument;
use uuid::Uuid;

use super::dto::{AuthResponse, LoginRequest, UserSummary, UsersResponse};
use super::services::{self, SignupInput};
use crate::error::ApiError;
use crate::failure;
use crate::state::AppState;

#[instrument(skip(state))]
pub async fn get_users(State(state): State<AppState>) -> Result<Json<UsersResponse>, ApiError> {
    let users = services::list_users(&state).await?;
    Ok(Json(UsersResponse {
        users: users.into_iter().map(UserSummary::from).collect(),
    }))
}

#[derive(Default)]
struct SignupForm {
    name: String,
    email: String,
    password: String,
    image: Option<UploadedImage>,
}

struct UploadedImage {
    bytes: Bytes,
    content_type: String,
    filename: String,
}

async fn read_signup_form(mut multipart: Multipart) -> Result<SignupForm, ApiError> {
    let mut form = SignupForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Internal(e.into()))?
    {
        let name = field.name().map(ToString::to_string);
        match name.as_deref() {
            Some("name") => {
                form.name = field.text().await.map_err(|e| ApiError::Internal(e.into()))?
            }
            Some("email") => {
                form.email = field.text().await.map_err(|e| ApiError::Internal(e.into()))?
            }
            Some("password") => {
                form.password = field.text().await.map_err(|e| ApiError::Internal(e.into()))?
            }
            Some("image") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Internal(e.into()))?;
                form.image = Some(UploadedImage {
                    bytes,
                    content_type,
                    filename,
                });
            }
            _ => {}
        }
    }
    Ok(form)
}

fn avatar_key_for(filename: &str) -> String {
    let ext = std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    format!("avatars/{}{}", Uuid::new_v4(), ext)
}

#[instrument(skip(state, multipart))]
pub async fn signup(State(state): State<AppState>, multipart: Multipart) -> Response {
    let form = match read_signup_form(multipart).await {
        Ok(form) => form,
        Err(e) => return failure::fail_request(state.storage.as_ref(), None, e).await,
    };

    let Some(image) = form.image else {
        return failure::fail_request(state.storage.as_ref(), None, ApiError::Validation).await;
    };

    // The avatar is durably stored before the account flow runs; from here
    // on, any failure must release it again.
    let avatar_key = avatar_key_for(&image.filename);
    if let Err(e) = state
        .storage
        .put_object(&avatar_key, image.bytes, &image.content_type)
        .await
    {
        return failure::fail_request(state.storage.as_ref(), None, ApiError::UploadFailed(e)).await;
    }

    let input = SignupInput {
        name: form.name,
        email: form.email,
        password: form.password,
        avatar_key: avatar_key.clone(),
    };
    match services::signup(&state, input).await {
        Ok(out) => (StatusCode::CREATED, Json(AuthResponse::from(out))).into_response(),
        Err(e) => failure::fail_request(state.storage.as_ref(), Some(&avatar_key), e).await,
    }
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let out = services::login(&state, &payload.email, &payload.password).await?;
    Ok(Json(AuthResponse::from(out)))
}
