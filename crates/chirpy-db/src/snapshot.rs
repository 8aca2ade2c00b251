//! Reading and atomically rewriting the snapshot file.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use chirpy_types::models::Snapshot;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::{StoreError, StoreResult};

pub fn load(path: &Path) -> StoreResult<Snapshot> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => StoreError::Missing {
            path: path.to_path_buf(),
        },
        _ => StoreError::Io(e),
    })?;

    let snapshot: Snapshot = serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    check_consistency(&snapshot).map_err(|reason| StoreError::Corrupt {
        path: path.to_path_buf(),
        reason,
    })?;

    Ok(snapshot)
}

/// Serialize `snapshot` to a temp file beside `path`, fsync it, then rename
/// it over `path`. A crash mid-write leaves the previous file intact.
pub fn write(path: &Path, snapshot: &Snapshot) -> StoreResult<()> {
    let data = serde_json::to_vec(snapshot)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;

    debug!("Snapshot saved ({} bytes)", data.len());
    Ok(())
}

/// Write an empty snapshot if `path` does not exist yet. Never touches an
/// existing file. Returns whether a file was created.
pub fn initialize(path: &Path) -> StoreResult<bool> {
    if path.try_exists()? {
        return Ok(false);
    }
    write(path, &Snapshot::default())?;
    info!("Created empty snapshot at {}", path.display());
    Ok(true)
}

/// Keys must match record ids, otherwise lookups would not find what the
/// file holds. Emails are not checked: updates may legitimately share one.
fn check_consistency(snapshot: &Snapshot) -> Result<(), String> {
    if let Some((key, chirp)) = snapshot.chirps.iter().find(|(key, chirp)| **key != chirp.id) {
        return Err(format!("chirp stored under key {} has id {}", key, chirp.id));
    }
    if let Some((key, user)) = snapshot.users.iter().find(|(key, user)| **key != user.id) {
        return Err(format!("user stored under key {} has id {}", key, user.id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chirpy_types::models::{Chirp, User};
    use chrono::{TimeZone, Utc};

    fn sample() -> Snapshot {
        let mut snapshot = Snapshot::default();
        snapshot.users.insert(
            1,
            User {
                id: 1,
                email: "a@x.com".into(),
                password_hash: "$argon2id$v=19$stub".into(),
                upgraded: false,
            },
        );
        snapshot.chirps.insert(
            2,
            Chirp {
                id: 2,
                author_id: 1,
                body: "hello".into(),
            },
        );
        snapshot.revoked_tokens.insert(
            "abc.def.ghi".into(),
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        );
        snapshot
    }

    #[test]
    fn write_then_load_is_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");

        write(&path, &sample()).unwrap();
        let first = fs::read(&path).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded, sample());

        write(&path, &loaded).unwrap();
        assert_eq!(fs::read(&path).unwrap(), first);
    }

    #[test]
    fn reads_the_documented_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        fs::write(
            &path,
            r#"{
                "chirps": {"1": {"id": 1, "author_id": 1, "body": "hi"}},
                "users": {"1": {"id": 1, "email": "a@x.com", "password": "h", "is_chirpy_red": true}},
                "revoked_tokens": {"tok": "2024-05-01T12:00:00Z"}
            }"#,
        )
        .unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.chirps[&1].body, "hi");
        assert!(loaded.users[&1].upgraded);
        assert_eq!(loaded.users[&1].password_hash, "h");
        assert!(loaded.revoked_tokens.contains_key("tok"));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, StoreError::Missing { .. }));
    }

    #[test]
    fn unparseable_file_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        fs::write(&path, b"{ \"chirps\": ").unwrap();

        assert!(matches!(load(&path).unwrap_err(), StoreError::Corrupt { .. }));
    }

    #[test]
    fn mismatched_keys_are_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        fs::write(
            &path,
            r#"{"chirps": {"1": {"id": 9, "author_id": 1, "body": "x"}}, "users": {}, "revoked_tokens": {}}"#,
        )
        .unwrap();

        assert!(matches!(load(&path).unwrap_err(), StoreError::Corrupt { .. }));
    }

    #[test]
    fn duplicate_emails_still_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        fs::write(
            &path,
            r#"{"chirps": {}, "users": {
                "1": {"id": 1, "email": "a@x.com", "password": "h", "is_chirpy_red": false},
                "2": {"id": 2, "email": "a@x.com", "password": "h", "is_chirpy_red": false}
            }, "revoked_tokens": {}}"#,
        )
        .unwrap();

        assert_eq!(load(&path).unwrap().users.len(), 2);
    }

    #[test]
    fn initialize_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");

        assert!(initialize(&path).unwrap());
        assert_eq!(load(&path).unwrap(), Snapshot::default());

        write(&path, &sample()).unwrap();
        assert!(!initialize(&path).unwrap());
        assert_eq!(load(&path).unwrap(), sample());
    }
}
