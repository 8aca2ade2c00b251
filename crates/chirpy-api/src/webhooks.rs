use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use tracing::{debug, info};

use chirpy_types::api::{USER_UPGRADED_EVENT, WebhookRequest};

use crate::middleware::api_key;
use crate::{ApiError, AppState, blocking};

/// Billing provider callback. Only `user.upgraded` changes anything; other
/// events are acknowledged and ignored.
pub async fn polka(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<WebhookRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let key = api_key(&headers).map_err(|_| ApiError::InvalidApiKey)?;
    if key != state.settings.polka_key {
        return Err(ApiError::InvalidApiKey);
    }

    if req.event != USER_UPGRADED_EVENT {
        debug!("Ignoring webhook event '{}'", req.event);
        return Ok(StatusCode::NO_CONTENT);
    }

    let user_id = req.data.user_id;
    blocking(move || Ok(state.store.upgrade_user(user_id)?)).await?;

    info!("Webhook upgraded user {}", user_id);
    Ok(StatusCode::NO_CONTENT)
}
