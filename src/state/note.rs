use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::errors::NoteError;

/// A single note. Never mutated after creation.
///
/// Serializes as `{"Time": ..., "Text": ...}`; the expiry stays internal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    #[serde(rename = "Time")]
    created_at: DateTime<Utc>,
    #[serde(rename = "Text")]
    text: String,
    #[serde(skip)]
    expires_at: Option<DateTime<Utc>>,
}

impl Note {
    /// Build a note created at `now`. Empty text is rejected.
    pub fn new(text: impl Into<String>, now: DateTime<Utc>, lifetime: Lifetime) -> Result<Self, NoteError> {
        let text = text.into();
        if text.is_empty() {
            return Err(NoteError::InvalidArgument("empty text".to_string()));
        }

        Ok(Self {
            created_at: now,
            text,
            expires_at: lifetime.expiry_from(now)?,
        })
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// True once `now` has reached the expiry instant.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(at) if at <= now)
    }
}

/// Longest accepted lifetime: one hundred years.
pub const MAX_LIFETIME_HOURS: u32 = 24 * 365 * 100;

/// Caller-requested time-to-live, in whole hours.
///
/// `Absent` and `Hours(0)` both mean "never expires"; they are kept apart so
/// the zero case is handled on purpose rather than by accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifetime {
    #[default]
    Absent,
    Hours(u32),
}

impl Lifetime {
    /// Parse the raw `lifetime` parameter. Missing or empty input is
    /// `Absent`; anything else must be a non-negative integer no larger
    /// than [`MAX_LIFETIME_HOURS`].
    pub fn parse(raw: Option<&str>) -> Result<Self, NoteError> {
        let value = match raw.map(str::trim) {
            None | Some("") => return Ok(Lifetime::Absent),
            Some(value) => value,
        };

        match value.parse::<u32>() {
            Ok(hours) if hours <= MAX_LIFETIME_HOURS => Ok(Lifetime::Hours(hours)),
            _ => Err(NoteError::InvalidArgument(format!("invalid lifetime {value:?}"))),
        }
    }

    /// Expiry instant for a note created at `now`, if any.
    pub fn expiry_from(self, now: DateTime<Utc>) -> Result<Option<DateTime<Utc>>, NoteError> {
        match self {
            Lifetime::Absent | Lifetime::Hours(0) => Ok(None),
            Lifetime::Hours(h) => now
                .checked_add_signed(Duration::hours(i64::from(h)))
                .map(Some)
                .ok_or_else(|| NoteError::InvalidArgument(format!("lifetime of {h}h overflows"))),
        }
    }
}

/// Parse a note position (0-based index into the ledger).
pub fn parse_position(raw: &str) -> Result<usize, NoteError> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| NoteError::InvalidArgument(format!("invalid position {raw:?}")))
}
