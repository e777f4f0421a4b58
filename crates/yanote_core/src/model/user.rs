//! User account model.

use serde::{Deserialize, Serialize};

/// Database row id of a user.
pub type UserId = i64;

/// Maximum username length in characters.
pub const USERNAME_MAX_CHARS: usize = 150;

/// Registered account.
///
/// `password_hash` is an argon2 PHC string and is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Administrative flag. Grants nothing over other users' notes.
    pub is_superuser: bool,
}
