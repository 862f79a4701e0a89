//! HTTP route handlers

pub mod analysis;
pub mod game;
pub mod outcome;
pub mod status;

use crate::error::ApiError;

/// Run solver work on the blocking pool instead of an async worker
pub(crate) async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?
}
