use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use chrono::Duration;
use tracing::{info, warn};

use chirpy_auth::TokenService;
use chirpy_db::{Store, StoreError};
use chirpy_types::api::{LoginRequest, LoginResponse, RefreshResponse};

use crate::middleware::bearer_token;
use crate::{ApiError, blocking};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub store: Store,
    pub tokens: TokenService,
    pub settings: AuthSettings,
    /// Requests served from `/app` since start or the last reset.
    pub hits: AtomicU64,
}

impl AppStateInner {
    pub fn new(store: Store, tokens: TokenService, settings: AuthSettings) -> Self {
        Self {
            store,
            tokens,
            settings,
            hits: AtomicU64::new(0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    /// Shared key the billing provider presents on webhooks.
    pub polka_key: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // A client may ask for a shorter-lived access token, never a longer one.
    let default_ttl = state.settings.access_ttl;
    let access_ttl = match req.expires_in_seconds {
        Some(secs) if secs > 0 => {
            Duration::try_seconds(secs).map_or(default_ttl, |d| d.min(default_ttl))
        }
        _ => default_ttl,
    };

    let st = state.clone();
    let user = blocking(move || {
        let user = st.store.check_login(&req.email).map_err(|e| match e {
            StoreError::NotFound(_) => ApiError::InvalidCredentials,
            other => other.into(),
        })?;

        // Password comparison is the caller's job, not the store's.
        if !st.store.hasher().verify(&user.password_hash, &req.password) {
            return Err(ApiError::InvalidCredentials);
        }
        Ok(user)
    })
    .await?;

    let token = state.tokens.issue_access(user.id, access_ttl)?;
    let refresh_token = state.tokens.issue_refresh(user.id, state.settings.refresh_ttl)?;

    info!("User {} logged in", user.id);
    Ok(Json(LoginResponse {
        user: user.into(),
        token,
        refresh_token,
    }))
}

/// Trade a live, unrevoked refresh token for a new access token.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let refresh_token = bearer_token(&headers)?.to_string();
    let user_id = state.tokens.validate_refresh(&refresh_token)?;

    let st = state.clone();
    if blocking(move || Ok(st.store.is_revoked(&refresh_token))).await? {
        warn!("Revoked refresh token presented for user {}", user_id);
        return Err(ApiError::RevokedToken);
    }

    let token = state.tokens.issue_access(user_id, state.settings.access_ttl)?;
    Ok(Json(RefreshResponse { token }))
}

pub async fn revoke(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let refresh_token = bearer_token(&headers)?.to_string();
    state.tokens.validate_refresh(&refresh_token)?;

    let st = state.clone();
    blocking(move || Ok(st.store.revoke_token(&refresh_token)?)).await?;

    Ok(StatusCode::NO_CONTENT)
}
