use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chirpy_auth::AuthError;
use chirpy_db::StoreError;
use chirpy_types::api::ErrorResponse;
use thiserror::Error;
use tracing::{error, warn};

/// Every failure a handler can return. Converts into a status code plus a
/// `{"error": ...}` body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("incorrect email or password")]
    InvalidCredentials,
    #[error("token has been revoked")]
    RevokedToken,
    #[error("invalid api key")]
    InvalidApiKey,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials | ApiError::RevokedToken | ApiError::InvalidApiKey => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Auth(err) => match err {
                AuthError::MissingCredentials
                | AuthError::MalformedHeader
                | AuthError::InvalidToken
                | AuthError::WrongTokenKind { .. } => StatusCode::UNAUTHORIZED,
                AuthError::Signing(_) | AuthError::PasswordHash(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::Store(err) => match err {
                StoreError::Validation(_) => StatusCode::BAD_REQUEST,
                StoreError::Conflict(_) => StatusCode::CONFLICT,
                StoreError::NotFound(_) => StatusCode::NOT_FOUND,
                StoreError::Forbidden => StatusCode::FORBIDDEN,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Server-side failures are not described.
    fn message(&self) -> String {
        if self.status().is_server_error() {
            "internal server error".to_string()
        } else {
            self.to_string()
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected ({}): {}", status.as_u16(), self);
        }

        let body = ErrorResponse {
            error: self.message(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chirpy_auth::TokenKind;

    #[test]
    fn maps_kinds_to_statuses() {
        let cases = [
            (ApiError::Store(StoreError::Validation("x".into())), StatusCode::BAD_REQUEST),
            (ApiError::Store(StoreError::Conflict("x".into())), StatusCode::CONFLICT),
            (ApiError::Store(StoreError::NotFound("chirp")), StatusCode::NOT_FOUND),
            (ApiError::Store(StoreError::Forbidden), StatusCode::FORBIDDEN),
            (
                ApiError::Store(StoreError::Io(std::io::Error::other("disk full"))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (ApiError::Auth(AuthError::InvalidToken), StatusCode::UNAUTHORIZED),
            (
                ApiError::Auth(AuthError::WrongTokenKind {
                    expected: TokenKind::Access,
                    found: TokenKind::Refresh,
                }),
                StatusCode::UNAUTHORIZED,
            ),
            (ApiError::RevokedToken, StatusCode::UNAUTHORIZED),
        ];

        for (err, status) in cases {
            assert_eq!(err.status(), status, "{err}");
        }
    }

    #[test]
    fn storage_details_stay_server_side() {
        let err = ApiError::Store(StoreError::Missing {
            path: "/srv/chirpy/database.json".into(),
        });
        assert_eq!(err.message(), "internal server error");
    }
}
