//! Note domain model.
//!
//! # Responsibility
//! - Define the owned note record and its field limits.
//!
//! # Invariants
//! - `slug` is globally unique and non-empty once persisted.
//! - `author` is the only user allowed to read or mutate the note.

use crate::model::user::UserId;
use serde::{Deserialize, Serialize};

/// Database row id of a note.
pub type NoteId = i64;

/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 100;
/// Maximum slug length in characters.
pub const SLUG_MAX_CHARS: usize = 100;

/// Persisted note owned by a single author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub text: String,
    /// Human-readable unique identifier used in URLs.
    pub slug: String,
    pub author: UserId,
}

impl Note {
    /// Returns whether `user` owns this note.
    pub fn is_authored_by(&self, user: UserId) -> bool {
        self.author == user
    }
}

/// Validated field values ready for insert/update.
///
/// Produced by `NoteForm::clean`; the slug is already derived and checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub text: String,
    pub slug: String,
}
