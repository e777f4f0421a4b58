//! User account repository contract and SQLite implementation.
//!
//! # Invariants
//! - `username` is unique; duplicates map to `RepoError::Conflict(username)`.
//! - Password hashes are stored verbatim; hashing happens in the service.

use crate::model::user::{User, UserId};
use crate::repo::{ensure_table, map_unique_violation, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const USER_SELECT_SQL: &str = "SELECT
    id,
    username,
    password_hash,
    is_superuser
FROM users";

/// Repository interface for user accounts.
pub trait UserRepository {
    fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        is_superuser: bool,
    ) -> RepoResult<User>;
    fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table(
            conn,
            "users",
            &["id", "username", "password_hash", "is_superuser"],
        )?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        is_superuser: bool,
    ) -> RepoResult<User> {
        self.conn
            .execute(
                "INSERT INTO users (username, password_hash, is_superuser)
                 VALUES (?1, ?2, ?3);",
                params![username, password_hash, bool_to_int(is_superuser)],
            )
            .map_err(|err| map_unique_violation(err, username))?;

        Ok(User {
            id: self.conn.last_insert_rowid(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            is_superuser,
        })
    }

    fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        self.conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE username = ?1;"),
                [username],
                read_user_row,
            )
            .optional()?
            .transpose()
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        self.conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE id = ?1;"),
                [id],
                read_user_row,
            )
            .optional()?
            .transpose()
    }
}

/// Reads a `users` row; the outer result carries SQLite errors, the inner one
/// rejects corrupted flag values.
pub(crate) fn read_user_row(row: &Row<'_>) -> rusqlite::Result<RepoResult<User>> {
    let flag: i64 = row.get("is_superuser")?;
    let is_superuser = match flag {
        0 => false,
        1 => true,
        other => {
            return Ok(Err(RepoError::InvalidData(format!(
                "invalid is_superuser value `{other}` in users.is_superuser"
            ))));
        }
    };

    Ok(Ok(User {
        id: row.get("id")?,
        username: row.get("username")?,
        password_hash: row.get("password_hash")?,
        is_superuser,
    }))
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
