use chrono::{DateTime, Utc};

use crate::state::note::Note;

/// Ordered notes of a single user. Insertion order is the only ordering.
#[derive(Debug, Default, Clone)]
pub struct UserLedger {
    notes: Vec<Note>,
}

impl UserLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append at the tail.
    pub fn push(&mut self, note: Note) {
        self.notes.push(note);
    }

    /// Remove the note at `index`, shifting later notes down by one.
    pub fn remove_at(&mut self, index: usize) -> Option<Note> {
        (index < self.notes.len()).then(|| self.notes.remove(index))
    }

    /// Drop every note expired as of `now`. Returns how many were removed.
    ///
    /// Single pass, one observation time for the whole ledger; survivors keep
    /// their relative order.
    pub fn sweep(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.notes.len();
        self.notes.retain(|note| !note.is_expired(now));
        before - self.notes.len()
    }

    pub fn snapshot(&self) -> Vec<Note> {
        self.notes.clone()
    }

    pub fn first(&self) -> Option<&Note> {
        self.notes.first()
    }

    pub fn last(&self) -> Option<&Note> {
        self.notes.last()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}
