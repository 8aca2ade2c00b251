pub mod error;
pub mod queries;
pub mod snapshot;

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chirpy_auth::PasswordHasher;
use chirpy_types::Id;
use chirpy_types::models::Snapshot;
use tracing::{error, info, warn};

pub use error::{StoreError, StoreResult};

/// A failed snapshot write is retried this many times in total before the
/// error is surfaced to the caller.
const WRITE_ATTEMPTS: u32 = 2;

/// In-memory chirps, users and revoked tokens, mirrored to one JSON file.
///
/// Mutations hold the write lock across both the in-memory change and the
/// snapshot rewrite, so id assignment and uniqueness checks are atomic and
/// readers never see a state the file does not also hold.
pub struct Store {
    path: PathBuf,
    hasher: PasswordHasher,
    state: RwLock<Snapshot>,
}

impl Store {
    /// Load the snapshot at `path`. A missing or unparseable file is an error;
    /// callers are expected to treat it as fatal.
    pub fn open(path: &Path, hasher: PasswordHasher) -> StoreResult<Self> {
        let mut state = snapshot::load(path)?;
        state.restore_counters();

        info!(
            "Store opened at {} ({} users, {} chirps, {} revoked tokens)",
            path.display(),
            state.users.len(),
            state.chirps.len(),
            state.revoked_tokens.len()
        );
        Ok(Self {
            path: path.to_path_buf(),
            hasher,
            state: RwLock::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    /// Copy of the full persisted state.
    pub fn snapshot(&self) -> Snapshot {
        self.read().clone()
    }

    /// The ids the next created chirp and user will receive.
    pub fn next_ids(&self) -> (Id, Id) {
        let state = self.read();
        (state.next_chirp_id, state.next_user_id)
    }

    /// Shared access for pure reads.
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Snapshot> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` under the exclusive lock and rewrite the snapshot if it
    /// succeeds. `f` must not mutate the snapshot on its error paths.
    pub(crate) fn with_write<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut Snapshot) -> StoreResult<T>,
    {
        let mut state = self.write();
        let value = f(&mut state)?;
        self.persist(&state)?;
        Ok(value)
    }

    /// Mutations only touch the snapshot once they can no longer fail, so a
    /// writer that panicked left it whole and the guard is recovered.
    fn write(&self) -> RwLockWriteGuard<'_, Snapshot> {
        self.state.write().unwrap_or_else(|poisoned| {
            warn!("Store lock was poisoned by a panicked writer, recovering");
            self.state.clear_poison();
            poisoned.into_inner()
        })
    }

    fn persist(&self, data: &Snapshot) -> StoreResult<()> {
        let mut attempt = 1;
        loop {
            match snapshot::write(&self.path, data) {
                Ok(()) => return Ok(()),
                Err(e) if attempt < WRITE_ATTEMPTS => {
                    warn!("Snapshot write attempt {} failed, retrying: {}", attempt, e);
                    attempt += 1;
                }
                Err(e) => {
                    // The in-memory change stands; the next successful write
                    // carries it to disk.
                    error!("Snapshot write failed after {} attempts: {}", attempt, e);
                    return Err(e);
                }
            }
        }
    }
}
