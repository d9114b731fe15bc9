//! Per-user note store served over HTTP.
//!
//! Each user owns an ordered ledger of text notes. A note may carry a
//! lifetime in hours; expired notes are swept lazily, right before any read
//! or delete touches the ledger.

pub mod app;
pub mod config;
pub mod errors;
pub mod routes;
pub mod services;
pub mod state;

pub use errors::NoteError;
pub use services::note_service::{NoteStore, Registration, SharedStore};
pub use state::clock::{Clock, ManualClock, SystemClock};
pub use state::ledger::UserLedger;
pub use state::note::{Lifetime, Note};
