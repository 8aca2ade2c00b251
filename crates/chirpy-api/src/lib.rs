pub mod auth;
pub mod chirps;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod moderation;
pub mod routes;
pub mod users;
pub mod webhooks;

use tracing::error;

pub use auth::{AppState, AppStateInner, AuthSettings};
pub use error::ApiError;
pub use routes::router;

/// Run store work (lock waits, file rewrites, password hashing) off the async
/// runtime.
pub(crate) async fn blocking<F, T>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        ApiError::Internal
    })?
}
