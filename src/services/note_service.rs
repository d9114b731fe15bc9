use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use tracing::debug;

use crate::errors::NoteError;
use crate::state::clock::{Clock, SystemClock};
use crate::state::ledger::UserLedger;
use crate::state::note::{Lifetime, Note};

/// Shared store handle used across the app.
pub type SharedStore = Arc<NoteStore>;

type LedgerHandle = Arc<Mutex<UserLedger>>;

/// Outcome of [`NoteStore::register_user`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Created,
    AlreadyExists,
}

/// Per-user note ledgers.
///
/// The key set sits behind an `RwLock` that is only write-locked to register
/// a user. Each ledger has its own `Mutex`, so operations on one user are
/// linearized while different users never contend beyond the brief read lock
/// taken to look the ledger up. No lock is held across an `.await`.
#[derive(Debug)]
pub struct NoteStore {
    users: RwLock<HashMap<String, LedgerHandle>>,
    clock: Arc<dyn Clock>,
}

impl Default for NoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Create an empty ledger for `user` unless one exists already.
    pub fn register_user(&self, user: &str) -> Result<Registration, NoteError> {
        if user.is_empty() {
            return Err(NoteError::InvalidArgument("empty user".to_string()));
        }

        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        if users.contains_key(user) {
            debug!(user, "registration ignored, user exists");
            return Ok(Registration::AlreadyExists);
        }

        users.insert(user.to_string(), Arc::default());
        debug!(user, total = users.len(), "registered user");
        Ok(Registration::Created)
    }

    /// Append a note to the tail of `user`'s ledger.
    pub fn add_note(&self, user: &str, text: &str, lifetime: Lifetime) -> Result<(), NoteError> {
        let handle = self.ledger(user)?;
        let note = Note::new(text, self.clock.now(), lifetime)?;

        let mut ledger = lock(&handle);
        ledger.push(note);
        debug!(user, ?lifetime, len = ledger.len(), "added note");
        Ok(())
    }

    /// Every live note of `user`, oldest first. May be empty.
    pub fn get_all(&self, user: &str) -> Result<Vec<Note>, NoteError> {
        let handle = self.ledger(user)?;
        let ledger = self.swept(user, &handle);
        Ok(ledger.snapshot())
    }

    pub fn get_first(&self, user: &str) -> Result<Note, NoteError> {
        let handle = self.ledger(user)?;
        let ledger = self.swept(user, &handle);
        ledger.first().cloned().ok_or(NoteError::EmptyLedger)
    }

    pub fn get_last(&self, user: &str) -> Result<Note, NoteError> {
        let handle = self.ledger(user)?;
        let ledger = self.swept(user, &handle);
        ledger.last().cloned().ok_or(NoteError::EmptyLedger)
    }

    /// Remove the note at `position` of the post-sweep ledger.
    pub fn delete_at(&self, user: &str, position: usize) -> Result<Note, NoteError> {
        let handle = self.ledger(user)?;
        let mut ledger = self.swept(user, &handle);
        let removed = ledger.remove_at(position).ok_or(NoteError::NotFound)?;
        debug!(user, position, len = ledger.len(), "deleted note");
        Ok(removed)
    }

    /// Users are never removed, so a `true` answer stays true.
    pub fn contains_user(&self, user: &str) -> bool {
        self.users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(user)
    }

    /// Number of registered users.
    pub fn user_count(&self) -> usize {
        self.users.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Number of live notes held for `user`.
    pub fn note_count(&self, user: &str) -> Result<usize, NoteError> {
        let handle = self.ledger(user)?;
        let ledger = self.swept(user, &handle);
        Ok(ledger.len())
    }

    fn ledger(&self, user: &str) -> Result<LedgerHandle, NoteError> {
        let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
        users.get(user).cloned().ok_or(NoteError::UnknownUser)
    }

    /// Lock the ledger and drop expired notes before handing it out.
    fn swept<'a>(&self, user: &str, handle: &'a LedgerHandle) -> MutexGuard<'a, UserLedger> {
        let mut ledger = lock(handle);
        let removed = ledger.sweep(self.clock.now());
        if removed > 0 {
            debug!(user, removed, remaining = ledger.len(), "swept expired notes");
        }
        ledger
    }
}

// Every mutation is a single Vec call, so a poisoned ledger is still valid.
fn lock(handle: &LedgerHandle) -> MutexGuard<'_, UserLedger> {
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}
