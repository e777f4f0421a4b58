//! Shared application state handed to every handler.
//!
//! # Invariants
//! - One SQLite connection serves all requests. Every use runs on tokio's
//!   blocking pool, so argon2 and SQLite work never stalls a runtime worker.
//! - The lock is held for a single service call and never across an
//!   `.await`.
//! - Services are built per call on top of the locked connection.

use crate::error::{WebError, WebResult};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tokio::task;
use yanote_core::{
    AuthService, NoteService, PasswordCost, SqliteNoteRepository, SqliteSessionRepository,
    SqliteUserRepository,
};

pub type SqliteAuthService<'conn> =
    AuthService<SqliteUserRepository<'conn>, SqliteSessionRepository<'conn>>;
pub type SqliteNoteService<'conn> = NoteService<SqliteNoteRepository<'conn>>;

#[derive(Clone)]
pub struct AppState {
    conn: Arc<Mutex<Connection>>,
    password_cost: PasswordCost,
}

impl AppState {
    /// Wraps a migrated connection.
    pub fn new(conn: Connection, password_cost: PasswordCost) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            password_cost,
        }
    }

    /// Runs `f` on the blocking pool with exclusive access to the connection.
    pub async fn with_conn<T, F>(&self, f: F) -> WebResult<T>
    where
        F: FnOnce(&Connection) -> WebResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|_| WebError::StatePoisoned)?;
            f(&conn)
        })
        .await
        .map_err(WebError::Blocking)?
    }

    /// Runs `f` with a note service over the shared connection.
    pub async fn with_notes<T, F>(&self, f: F) -> WebResult<T>
    where
        F: FnOnce(&SqliteNoteService<'_>) -> WebResult<T> + Send + 'static,
        T: Send + 'static,
    {
        self.with_conn(move |conn| {
            let service = NoteService::new(SqliteNoteRepository::try_new(conn)?);
            f(&service)
        })
        .await
    }

    /// Runs `f` with an auth service over the shared connection.
    pub async fn with_auth<T, F>(&self, f: F) -> WebResult<T>
    where
        F: FnOnce(&SqliteAuthService<'_>) -> WebResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let cost = self.password_cost;
        self.with_conn(move |conn| {
            let service = AuthService::with_cost(
                SqliteUserRepository::try_new(conn)?,
                SqliteSessionRepository::try_new(conn)?,
                cost,
            )?;
            f(&service)
        })
        .await
    }
}
