use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Id;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chirp {
    pub id: Id,
    pub author_id: Id,
    pub body: String,
}

/// A registered account. `password_hash` is a PHC string, never the raw password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub email: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    /// Set by the billing webhook once the account has paid.
    #[serde(rename = "is_chirpy_red")]
    pub upgraded: bool,
}

/// The on-disk document. Integer keys are written as JSON object keys
/// (`"1"`, `"2"`, ...); ordered maps keep the output stable.
///
/// The id counters are written alongside the collections so a deleted
/// highest id is not handed out again after a restart. Files without them
/// load with zero, which [`Snapshot::restore_counters`] raises.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub chirps: BTreeMap<Id, Chirp>,
    pub users: BTreeMap<Id, User>,
    pub revoked_tokens: BTreeMap<String, DateTime<Utc>>,
    #[serde(default)]
    pub next_chirp_id: Id,
    #[serde(default)]
    pub next_user_id: Id,
}

impl Snapshot {
    /// Raise each counter to at least one past the highest stored id.
    /// Stored counters that are already higher are kept.
    pub fn restore_counters(&mut self) {
        let chirp_floor = self.chirps.keys().next_back().map_or(1, |id| id + 1);
        let user_floor = self.users.keys().next_back().map_or(1, |id| id + 1);
        self.next_chirp_id = self.next_chirp_id.max(chirp_floor);
        self.next_user_id = self.next_user_id.max(user_floor);
    }
}
