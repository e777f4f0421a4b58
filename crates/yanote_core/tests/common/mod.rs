//! Shared fixtures: one connection seeded with the four standard accounts.

#![allow(dead_code)]

use rusqlite::Connection;
use yanote_core::db::open_db_in_memory;
use yanote_core::{
    AuthService, Note, NoteForm, NoteService, PasswordCost, SqliteNoteRepository,
    SqliteSessionRepository, SqliteUserRepository, User,
};

pub const PASSWORD: &str = "password";

/// Minimal argon2 cost keeps fixture setup fast.
pub const FAST_COST: PasswordCost = PasswordCost {
    memory_kib: 8,
    iterations: 1,
};

pub struct Fixture {
    pub conn: Connection,
    pub author: User,
    pub not_author: User,
    pub admin: User,
    pub another: User,
}

impl Fixture {
    pub fn new() -> Self {
        let conn = open_db_in_memory().unwrap();
        let (author, not_author, admin, another) = {
            let auth = auth_service(&conn);
            (
                auth.create_user("author", PASSWORD).unwrap(),
                auth.create_user("not_author", PASSWORD).unwrap(),
                auth.create_superuser("admin", PASSWORD).unwrap(),
                auth.create_user("Другой пользователь", PASSWORD).unwrap(),
            )
        };
        Self {
            conn,
            author,
            not_author,
            admin,
            another,
        }
    }

    pub fn notes(&self) -> NoteService<SqliteNoteRepository<'_>> {
        NoteService::new(SqliteNoteRepository::try_new(&self.conn).unwrap())
    }

    pub fn auth(&self) -> AuthService<SqliteUserRepository<'_>, SqliteSessionRepository<'_>> {
        auth_service(&self.conn)
    }

    /// Stores a note for `author`; the slug is derived from the title.
    pub fn seed_note(&self, title: &str, text: &str) -> Note {
        self.notes()
            .create_note(self.author.id, &NoteForm::new(title, text, ""))
            .unwrap()
    }
}

pub fn auth_service(
    conn: &Connection,
) -> AuthService<SqliteUserRepository<'_>, SqliteSessionRepository<'_>> {
    AuthService::with_cost(
        SqliteUserRepository::try_new(conn).unwrap(),
        SqliteSessionRepository::try_new(conn).unwrap(),
        FAST_COST,
    )
    .unwrap()
}
