use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use chirpy_auth::bearer::{API_KEY_SCHEME, BEARER_SCHEME};
use chirpy_auth::{AuthResult, authorization_credential};
use chirpy_types::Id;

use crate::{ApiError, AppState};

/// The caller behind a valid access token.
///
/// Handlers that take this extractor reject requests without one. Refresh
/// tokens are refused here, so a captured refresh token cannot stand in
/// for an access token.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: Id,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let id = state.tokens.validate_access(token)?;
        Ok(AuthUser { id })
    }
}

/// Extract the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> AuthResult<&str> {
    authorization_credential(authorization(headers), BEARER_SCHEME)
}

/// Extract the key from `Authorization: ApiKey <key>`.
pub fn api_key(headers: &HeaderMap) -> AuthResult<&str> {
    authorization_credential(authorization(headers), API_KEY_SCHEME)
}

fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
}
