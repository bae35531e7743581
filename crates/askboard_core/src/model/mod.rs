//! Forum domain model.
//!
//! # Responsibility
//! - Define the canonical records held by the forum store.
//! - Own field-level validation shared by repositories and services.
//!
//! # Invariants
//! - Every record is identified by a stable, non-nil UUID.
//! - Questions and answers are never deleted by core.
//! - A vote targets exactly one question or exactly one answer.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

pub mod answer;
pub mod profile;
pub mod question;
pub mod session;
pub mod vote;

/// Identifier supplied by the external identity provider.
pub type UserId = Uuid;

/// Field-level validation failures for forum records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// An identifier field holds the nil UUID.
    NilId(&'static str),
    /// A required text field is empty after trimming.
    Blank(&'static str),
    /// A tag is empty after trimming.
    BlankTag,
    /// Question carries more tags than allowed.
    TooManyTags { count: usize, max: usize },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId(field) => write!(f, "{field} must not be nil"),
            Self::Blank(field) => write!(f, "{field} must not be blank"),
            Self::BlankTag => write!(f, "tags must not be blank"),
            Self::TooManyTags { count, max } => {
                write!(f, "too many tags: {count} given, at most {max} allowed")
            }
        }
    }
}

impl Error for ValidationError {}

/// Current wall-clock time in Unix epoch milliseconds.
///
/// Clamps to `0` for clocks set before the epoch.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

pub(crate) fn require_id(id: Uuid, field: &'static str) -> Result<(), ValidationError> {
    if id.is_nil() {
        return Err(ValidationError::NilId(field));
    }
    Ok(())
}

pub(crate) fn require_text(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank(field));
    }
    Ok(())
}
