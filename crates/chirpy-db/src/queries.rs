use chirpy_types::models::{Chirp, User};
use chirpy_types::{Id, MAX_CHIRP_LENGTH};
use chrono::Utc;
use tracing::info;

use crate::{Store, StoreError, StoreResult};

impl Store {
    // -- Chirps --

    pub fn create_chirp(&self, body: &str, author_id: Id) -> StoreResult<Chirp> {
        if body.trim().is_empty() {
            return Err(StoreError::Validation("chirp body is empty".into()));
        }
        if body.chars().count() > MAX_CHIRP_LENGTH {
            return Err(StoreError::Validation("chirp is too long".into()));
        }

        let chirp = self.with_write(|state| {
            let chirp = Chirp {
                id: state.next_chirp_id,
                author_id,
                body: body.to_string(),
            };
            state.chirps.insert(chirp.id, chirp.clone());
            state.next_chirp_id += 1;
            Ok(chirp)
        })?;

        info!("Chirp {} created by user {}", chirp.id, author_id);
        Ok(chirp)
    }

    /// Remove a chirp on behalf of `caller_id`, who must be its author.
    pub fn delete_chirp(&self, chirp_id: Id, caller_id: Id) -> StoreResult<()> {
        self.with_write(|state| {
            let chirp = state
                .chirps
                .get(&chirp_id)
                .ok_or(StoreError::NotFound("chirp"))?;
            if chirp.author_id != caller_id {
                return Err(StoreError::Forbidden);
            }
            state.chirps.remove(&chirp_id);
            Ok(())
        })?;

        info!("Chirp {} deleted by user {}", chirp_id, caller_id);
        Ok(())
    }

    pub fn get_chirp(&self, id: Id) -> StoreResult<Chirp> {
        self.read()
            .chirps
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound("chirp"))
    }

    /// All chirps in ascending id order.
    pub fn get_chirps(&self) -> Vec<Chirp> {
        self.read().chirps.values().cloned().collect()
    }

    // -- Users --

    pub fn create_user(&self, email: &str, password: &str) -> StoreResult<User> {
        if email.trim().is_empty() {
            return Err(StoreError::Validation("email is empty".into()));
        }
        if self.email_taken(email) {
            return Err(email_conflict());
        }

        // Hash outside the lock; the uniqueness check is repeated under it.
        let password_hash = self.hasher().hash(password)?;

        let user = self.with_write(|state| {
            if state.users.values().any(|u| u.email == email) {
                return Err(email_conflict());
            }
            let user = User {
                id: state.next_user_id,
                email: email.to_string(),
                password_hash,
                upgraded: false,
            };
            state.users.insert(user.id, user.clone());
            state.next_user_id += 1;
            Ok(user)
        })?;

        info!("User {} created", user.id);
        Ok(user)
    }

    /// Replace a user's email and password. The new email is not checked
    /// against other accounts.
    pub fn update_user(&self, email: &str, password: &str, user_id: Id) -> StoreResult<User> {
        self.get_user(user_id)?;
        let password_hash = self.hasher().hash(password)?;

        let user = self.with_write(|state| {
            let user = state
                .users
                .get_mut(&user_id)
                .ok_or(StoreError::NotFound("user"))?;
            user.email = email.to_string();
            user.password_hash = password_hash;
            Ok(user.clone())
        })?;

        info!("User {} updated", user_id);
        Ok(user)
    }

    /// Mark a user as upgraded. Applying it twice changes nothing further.
    pub fn upgrade_user(&self, user_id: Id) -> StoreResult<()> {
        self.with_write(|state| {
            let user = state
                .users
                .get_mut(&user_id)
                .ok_or(StoreError::NotFound("user"))?;
            user.upgraded = true;
            Ok(())
        })?;

        info!("User {} upgraded", user_id);
        Ok(())
    }

    pub fn get_user(&self, id: Id) -> StoreResult<User> {
        self.read()
            .users
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound("user"))
    }

    /// Look up the account for a login attempt. The password is checked by
    /// the caller.
    pub fn check_login(&self, email: &str) -> StoreResult<User> {
        self.read()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(StoreError::NotFound("user"))
    }

    fn email_taken(&self, email: &str) -> bool {
        self.read().users.values().any(|u| u.email == email)
    }

    // -- Revoked tokens --

    pub fn revoke_token(&self, token: &str) -> StoreResult<()> {
        self.with_write(|state| {
            if state.revoked_tokens.contains_key(token) {
                return Err(StoreError::Conflict("token already revoked".into()));
            }
            state.revoked_tokens.insert(token.to_string(), Utc::now());
            Ok(())
        })?;

        info!("Refresh token revoked");
        Ok(())
    }

    pub fn is_revoked(&self, token: &str) -> bool {
        self.read().revoked_tokens.contains_key(token)
    }
}

fn email_conflict() -> StoreError {
    StoreError::Conflict("email already registered".into())
}
