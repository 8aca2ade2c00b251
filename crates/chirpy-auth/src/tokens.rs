use std::fmt;

use chirpy_types::Id;
use chirpy_types::api::Claims;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::debug;

use crate::{AuthError, AuthResult};

pub const ACCESS_ISSUER: &str = "chirpy-access";
pub const REFRESH_ISSUER: &str = "chirpy-refresh";

/// Which of the two token kinds a JWT is. Encoded as the `iss` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn issuer(self) -> &'static str {
        match self {
            TokenKind::Access => ACCESS_ISSUER,
            TokenKind::Refresh => REFRESH_ISSUER,
        }
    }

    fn from_issuer(issuer: &str) -> Option<Self> {
        match issuer {
            ACCESS_ISSUER => Some(TokenKind::Access),
            REFRESH_ISSUER => Some(TokenKind::Refresh),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Access => f.write_str("access"),
            TokenKind::Refresh => f.write_str("refresh"),
        }
    }
}

/// Mints and checks HS256 tokens signed with one shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn issue_access(&self, user_id: Id, ttl: Duration) -> AuthResult<String> {
        self.issue(TokenKind::Access, user_id, ttl)
    }

    pub fn issue_refresh(&self, user_id: Id, ttl: Duration) -> AuthResult<String> {
        self.issue(TokenKind::Refresh, user_id, ttl)
    }

    /// Returns the user id of a valid access token. A refresh token fails
    /// with [`AuthError::WrongTokenKind`].
    pub fn validate_access(&self, token: &str) -> AuthResult<Id> {
        self.validate(token, TokenKind::Access)
    }

    /// Returns the user id of a valid refresh token. An access token fails
    /// with [`AuthError::WrongTokenKind`].
    pub fn validate_refresh(&self, token: &str) -> AuthResult<Id> {
        self.validate(token, TokenKind::Refresh)
    }

    fn issue(&self, kind: TokenKind, user_id: Id, ttl: Duration) -> AuthResult<String> {
        let now = Utc::now();
        let claims = Claims {
            iss: kind.issuer().to_string(),
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    fn validate(&self, token: &str, expected: TokenKind) -> AuthResult<Id> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!("Token rejected: {}", e);
                AuthError::InvalidToken
            })?
            .claims;

        let found = TokenKind::from_issuer(&claims.iss).ok_or_else(|| {
            debug!("Token rejected: unknown issuer '{}'", claims.iss);
            AuthError::InvalidToken
        })?;
        if found != expected {
            return Err(AuthError::WrongTokenKind { expected, found });
        }

        claims.sub.parse::<Id>().map_err(|_| {
            debug!("Token rejected: non-numeric subject '{}'", claims.sub);
            AuthError::InvalidToken
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "super-secret-test-key";

    fn service() -> TokenService {
        TokenService::new(SECRET)
    }

    #[test]
    fn access_token_round_trips_user_id() {
        let tokens = service();
        let token = tokens.issue_access(42, Duration::minutes(60)).unwrap();
        assert_eq!(tokens.validate_access(&token).unwrap(), 42);
    }

    #[test]
    fn refresh_token_round_trips_user_id() {
        let tokens = service();
        let token = tokens.issue_refresh(7, Duration::days(60)).unwrap();
        assert_eq!(tokens.validate_refresh(&token).unwrap(), 7);
    }

    #[test]
    fn refresh_token_is_not_an_access_token() {
        let tokens = service();
        let refresh = tokens.issue_refresh(1, Duration::days(60)).unwrap();

        let err = tokens.validate_access(&refresh).unwrap_err();
        assert!(matches!(
            err,
            AuthError::WrongTokenKind {
                expected: TokenKind::Access,
                found: TokenKind::Refresh
            }
        ));
    }

    #[test]
    fn access_token_is_not_a_refresh_token() {
        let tokens = service();
        let access = tokens.issue_access(1, Duration::minutes(60)).unwrap();

        let err = tokens.validate_refresh(&access).unwrap_err();
        assert!(matches!(
            err,
            AuthError::WrongTokenKind {
                expected: TokenKind::Refresh,
                found: TokenKind::Access
            }
        ));
    }

    #[test]
    fn expired_tokens_are_invalid() {
        let tokens = service();
        let access = tokens.issue_access(1, Duration::seconds(-30)).unwrap();
        let refresh = tokens.issue_refresh(1, Duration::seconds(-30)).unwrap();

        assert!(matches!(tokens.validate_access(&access), Err(AuthError::InvalidToken)));
        assert!(matches!(tokens.validate_refresh(&refresh), Err(AuthError::InvalidToken)));
        // Expiry is checked before kind.
        assert!(matches!(tokens.validate_refresh(&access), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn foreign_signature_is_invalid() {
        let token = TokenService::new("another-secret")
            .issue_access(1, Duration::minutes(5))
            .unwrap();

        assert!(matches!(service().validate_access(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn garbage_is_invalid() {
        let tokens = service();
        assert!(matches!(tokens.validate_access("not.a.jwt"), Err(AuthError::InvalidToken)));
        assert!(matches!(tokens.validate_refresh(""), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn unknown_issuer_is_invalid() {
        let claims = Claims {
            iss: "someone-else".into(),
            sub: "1".into(),
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::minutes(5)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(service().validate_access(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn non_numeric_subject_is_invalid() {
        let claims = Claims {
            iss: ACCESS_ISSUER.into(),
            sub: "alice".into(),
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::minutes(5)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(service().validate_access(&token), Err(AuthError::InvalidToken)));
    }
}
