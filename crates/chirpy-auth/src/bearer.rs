use crate::{AuthError, AuthResult};

pub const BEARER_SCHEME: &str = "Bearer";
pub const API_KEY_SCHEME: &str = "ApiKey";

/// Pull the credential out of an `Authorization` header value of the form
/// `<scheme> <credential>`. The scheme is matched case-insensitively.
pub fn authorization_credential<'a>(header: Option<&'a str>, scheme: &str) -> AuthResult<&'a str> {
    let header = header.ok_or(AuthError::MissingCredentials)?;
    let mut parts = header.split_whitespace();

    match (parts.next(), parts.next(), parts.next()) {
        (Some(found), Some(credential), None) if found.eq_ignore_ascii_case(scheme) => {
            Ok(credential)
        }
        _ => Err(AuthError::MalformedHeader),
    }
}
