use thiserror::Error;

use crate::tokens::TokenKind;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing authorization header")]
    MissingCredentials,
    #[error("malformed authorization header")]
    MalformedHeader,
    /// Expired, badly signed, malformed, or carrying an unknown issuer.
    #[error("invalid token")]
    InvalidToken,
    #[error("expected {expected} token, got {found} token")]
    WrongTokenKind { expected: TokenKind, found: TokenKind },
    #[error("token signing error: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
    #[error("password hashing error: {0}")]
    PasswordHash(String),
}

impl From<argon2::password_hash::Error> for AuthError {
    fn from(err: argon2::password_hash::Error) -> Self {
        AuthError::PasswordHash(err.to_string())
    }
}
