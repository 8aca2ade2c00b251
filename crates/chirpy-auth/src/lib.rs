//! Credential handling for chirpy: password hashing, signed access/refresh
//! tokens, and `Authorization` header parsing.

pub mod bearer;
pub mod error;
pub mod passwords;
pub mod tokens;

pub use bearer::authorization_credential;
pub use error::{AuthError, AuthResult};
pub use passwords::PasswordHasher;
pub use tokens::{TokenKind, TokenService};
