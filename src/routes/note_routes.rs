use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};

use crate::errors::NoteError;
use crate::services::note_service::{Registration, SharedStore};
use crate::state::note::{parse_position, Lifetime, Note};

/// Build all note routes under /api
pub fn routes(store: SharedStore) -> Router {
    Router::new()
        .route("/register-user", get(register_user))
        .route("/add-new-user", get(register_user))
        .route("/add-note", get(add_note))
        .route("/delete-note", get(delete_note))
        .route("/get-all-notes", get(get_all_notes))
        .route("/get-first-note", get(get_first_note))
        .route("/get-last-note", get(get_last_note))
        .with_state(store)
}

/// Query string shared by every endpoint. Missing values read as empty.
#[derive(Debug, Default, Deserialize)]
pub struct NoteParams {
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub text: String,
    pub lifetime: Option<String>,
    #[serde(default)]
    pub id: String,
}

/// Single text line sent back to the client.
#[derive(Debug)]
pub struct Reply {
    status: StatusCode,
    body: String,
}

impl Reply {
    fn ok(body: impl Into<String>) -> Self {
        Self::with_status(StatusCode::OK, body)
    }

    fn with_status(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    fn json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(js) => Self::ok(js),
            Err(e) => {
                tracing::warn!("Failed to serialize notes: {e}");
                Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
            }
        }
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        (self.status, format!("{}\n", self.body)).into_response()
    }
}

// Reply lines shared by the read and delete endpoints.
const EMPTY_USER: &str = "Empty user";
const NOT_FOUND_USER: &str = "Not found user";
const EMPTY_NOTES: &str = "Empty notes";

//
// ─────────────────────────────────────────────────────────────
// GET /api/register-user?user=
// Create an empty ledger for a new user
// ─────────────────────────────────────────────────────────────
//
async fn register_user(State(store): State<SharedStore>, Query(params): Query<NoteParams>) -> Reply {
    match store.register_user(&params.user) {
        Ok(Registration::Created) => {
            tracing::info!(user = %params.user, "Registered user");
            Reply::ok(format!("Added new User {}", params.user))
        }
        Ok(Registration::AlreadyExists) => {
            Reply::with_status(StatusCode::CONFLICT, "Such a user already exists")
        }
        Err(_) => Reply::with_status(StatusCode::BAD_REQUEST, EMPTY_USER),
    }
}

//
// ─────────────────────────────────────────────────────────────
// GET /api/add-note?user=&text=&lifetime=
// Append a note, optionally expiring after `lifetime` hours
// ─────────────────────────────────────────────────────────────
//
async fn add_note(State(store): State<SharedStore>, Query(params): Query<NoteParams>) -> Reply {
    const UNIDENTIFIED_USER: &str = "Unidentified user";

    if params.user.is_empty() {
        return Reply::with_status(StatusCode::BAD_REQUEST, UNIDENTIFIED_USER);
    }
    if !store.contains_user(&params.user) {
        return Reply::with_status(StatusCode::NOT_FOUND, UNIDENTIFIED_USER);
    }
    if params.text.is_empty() {
        return Reply::with_status(StatusCode::BAD_REQUEST, "Empty text");
    }
    let lifetime = match Lifetime::parse(params.lifetime.as_deref()) {
        Ok(lifetime) => lifetime,
        Err(_) => return Reply::with_status(StatusCode::BAD_REQUEST, "Invalid lifetime"),
    };

    match store.add_note(&params.user, &params.text, lifetime) {
        Ok(()) => {
            tracing::info!(user = %params.user, ?lifetime, "Added note");
            Reply::ok("Added new Note")
        }
        Err(NoteError::UnknownUser) => Reply::with_status(StatusCode::NOT_FOUND, UNIDENTIFIED_USER),
        Err(NoteError::InvalidArgument(_)) => Reply::with_status(StatusCode::BAD_REQUEST, "Invalid lifetime"),
        Err(e) => unexpected(e),
    }
}

//
// ─────────────────────────────────────────────────────────────
// GET /api/delete-note?user=&id=
// Remove the note at position `id` (0-based, after expiry)
// ─────────────────────────────────────────────────────────────
//
async fn delete_note(State(store): State<SharedStore>, Query(params): Query<NoteParams>) -> Reply {
    if params.user.is_empty() {
        return Reply::with_status(StatusCode::BAD_REQUEST, EMPTY_USER);
    }
    if !store.contains_user(&params.user) {
        return Reply::with_status(StatusCode::NOT_FOUND, NOT_FOUND_USER);
    }
    if params.id.is_empty() {
        return Reply::with_status(StatusCode::BAD_REQUEST, "Empty id note");
    }
    let position = match parse_position(&params.id) {
        Ok(position) => position,
        Err(_) => return Reply::with_status(StatusCode::BAD_REQUEST, "Invalid id"),
    };

    match store.delete_at(&params.user, position) {
        Ok(_) => {
            tracing::info!(user = %params.user, position, "Deleted note");
            Reply::ok("Note deleted")
        }
        Err(NoteError::UnknownUser) => Reply::with_status(StatusCode::NOT_FOUND, NOT_FOUND_USER),
        Err(NoteError::NotFound) => Reply::with_status(StatusCode::NOT_FOUND, "Not found Note"),
        Err(e) => unexpected(e),
    }
}

//
// ─────────────────────────────────────────────────────────────
// GET /api/get-all-notes?user=
// JSON array of live notes, oldest first
// ─────────────────────────────────────────────────────────────
//
async fn get_all_notes(State(store): State<SharedStore>, Query(params): Query<NoteParams>) -> Reply {
    if params.user.is_empty() {
        return Reply::with_status(StatusCode::BAD_REQUEST, EMPTY_USER);
    }

    match store.get_all(&params.user) {
        Ok(notes) if notes.is_empty() => read_failure(NoteError::EmptyLedger),
        Ok(notes) => Reply::json(&notes),
        Err(e) => read_failure(e),
    }
}

//
// ─────────────────────────────────────────────────────────────
// GET /api/get-first-note?user=
// GET /api/get-last-note?user=
// JSON of the oldest / newest live note
// ─────────────────────────────────────────────────────────────
//
async fn get_first_note(State(store): State<SharedStore>, Query(params): Query<NoteParams>) -> Reply {
    single_note(&params, |user| store.get_first(user))
}

async fn get_last_note(State(store): State<SharedStore>, Query(params): Query<NoteParams>) -> Reply {
    single_note(&params, |user| store.get_last(user))
}

fn single_note(params: &NoteParams, fetch: impl FnOnce(&str) -> Result<Note, NoteError>) -> Reply {
    if params.user.is_empty() {
        return Reply::with_status(StatusCode::BAD_REQUEST, EMPTY_USER);
    }

    match fetch(&params.user) {
        Ok(note) => Reply::json(&note),
        Err(e) => read_failure(e),
    }
}

fn read_failure(err: NoteError) -> Reply {
    match err {
        NoteError::UnknownUser => Reply::with_status(StatusCode::NOT_FOUND, NOT_FOUND_USER),
        NoteError::EmptyLedger => Reply::with_status(StatusCode::NOT_FOUND, EMPTY_NOTES),
        e => unexpected(e),
    }
}

fn unexpected(err: NoteError) -> Reply {
    tracing::warn!("Unexpected store error: {err}");
    Reply::with_status(StatusCode::BAD_REQUEST, err.to_string())
}
