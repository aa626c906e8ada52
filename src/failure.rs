//! Terminal stage for failed requests. Every handler error path converges
//! here so that a file stored earlier in the request's lifecycle is never
//! orphaned when a later stage fails.

use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::error::ApiError;
use crate::storage::StorageClient;

/// Releases the request's upload, if any, then renders the error. The
/// cleanup is best-effort: its own failure is logged and swallowed, it
/// never replaces or delays the client-facing response.
pub async fn fail_request(
    storage: &dyn StorageClient,
    uploaded: Option<&str>,
    error: ApiError,
) -> Response {
    if let Some(key) = uploaded {
        if let Err(e) = storage.delete_object(key).await {
            warn!(error = %e, key, "could not remove uploaded file while failing request");
        }
    }
    error.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingStorage;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn deletes_the_upload_exactly_once_before_responding() {
        let storage = RecordingStorage::default();
        let res = fail_request(
            &storage,
            Some("avatars/ann.png"),
            ApiError::AccountCreationFailed(anyhow::anyhow!("insert failed")),
        )
        .await;
        assert_eq!(storage.deleted_keys(), vec!["avatars/ann.png".to_string()]);
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn no_upload_means_no_delete() {
        let storage = RecordingStorage::default();
        let res = fail_request(&storage, None, ApiError::Validation).await;
        assert!(storage.deleted_keys().is_empty());
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn cleanup_failure_is_swallowed() {
        let storage = RecordingStorage::default();
        storage.fail_deletes();
        let res = fail_request(&storage, Some("avatars/ann.png"), ApiError::DuplicateAccount).await;
        // The delete was attempted, its failure did not change the response.
        assert_eq!(storage.deleted_keys(), vec!["avatars/ann.png".to_string()]);
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
