//! Login session repository.
//!
//! # Invariants
//! - A token maps to at most one user; deleting the user drops its sessions.

use crate::model::user::{User, UserId};
use crate::repo::user_repo::read_user_row;
use crate::repo::{ensure_table, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Repository interface for server-side sessions.
pub trait SessionRepository {
    fn create_session(&self, token: &str, user: UserId) -> RepoResult<()>;
    /// Resolves a token to its user, if the session is still present.
    fn find_user(&self, token: &str) -> RepoResult<Option<User>>;
    /// Removes a session. Unknown tokens are not an error.
    fn delete_session(&self, token: &str) -> RepoResult<()>;
}

/// SQLite-backed session repository.
pub struct SqliteSessionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSessionRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table(conn, "sessions", &["token", "user_id"])?;
        Ok(Self { conn })
    }
}

impl SessionRepository for SqliteSessionRepository<'_> {
    fn create_session(&self, token: &str, user: UserId) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO sessions (token, user_id) VALUES (?1, ?2);",
            params![token, user],
        )?;
        Ok(())
    }

    fn find_user(&self, token: &str) -> RepoResult<Option<User>> {
        self.conn
            .query_row(
                "SELECT
                    u.id,
                    u.username,
                    u.password_hash,
                    u.is_superuser
                 FROM sessions s
                 INNER JOIN users u ON u.id = s.user_id
                 WHERE s.token = ?1;",
                [token],
                read_user_row,
            )
            .optional()?
            .transpose()
    }

    fn delete_session(&self, token: &str) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM sessions WHERE token = ?1;", [token])?;
        Ok(())
    }
}
