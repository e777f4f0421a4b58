//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist notes and read them back scoped to their author.
//! - Answer slug-uniqueness questions for form validation.
//!
//! # Invariants
//! - Every read/update/delete that serves a requester filters on
//!   `author_id`; a foreign note looks exactly like a missing one.
//! - `slug` uniqueness is enforced by the schema; violations map to
//!   `RepoError::Conflict(slug)`.

use crate::model::note::{Note, NoteDraft, NoteId};
use crate::model::user::UserId;
use crate::repo::{ensure_table, map_unique_violation, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    title,
    text,
    slug,
    author_id
FROM notes";

/// Repository interface for owned notes.
pub trait NoteRepository {
    /// Inserts a note for `author` and returns the stored row.
    fn create_note(&self, author: UserId, draft: &NoteDraft) -> RepoResult<Note>;
    /// Replaces title/text/slug of a note owned by `author`.
    fn update_note(&self, author: UserId, id: NoteId, draft: &NoteDraft) -> RepoResult<()>;
    /// Hard-deletes a note owned by `author`.
    fn delete_note(&self, author: UserId, id: NoteId) -> RepoResult<()>;
    /// Looks up a note by slug, visible only to its author.
    fn find_by_slug(&self, author: UserId, slug: &str) -> RepoResult<Option<Note>>;
    /// Lists every note of `author`, oldest first.
    fn list_by_author(&self, author: UserId) -> RepoResult<Vec<Note>>;
    /// Returns whether any note other than `exclude` already uses `slug`.
    fn slug_exists(&self, slug: &str, exclude: Option<NoteId>) -> RepoResult<bool>;
    /// Total number of stored notes across all authors.
    fn count_notes(&self) -> RepoResult<u64>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// Fails fast when the `notes` table is missing expected columns.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table(conn, "notes", &["id", "title", "text", "slug", "author_id"])?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create_note(&self, author: UserId, draft: &NoteDraft) -> RepoResult<Note> {
        self.conn
            .execute(
                "INSERT INTO notes (title, text, slug, author_id)
                 VALUES (?1, ?2, ?3, ?4);",
                params![draft.title, draft.text, draft.slug, author],
            )
            .map_err(|err| map_unique_violation(err, &draft.slug))?;

        Ok(Note {
            id: self.conn.last_insert_rowid(),
            title: draft.title.clone(),
            text: draft.text.clone(),
            slug: draft.slug.clone(),
            author,
        })
    }

    fn update_note(&self, author: UserId, id: NoteId, draft: &NoteDraft) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE notes
                 SET
                    title = ?1,
                    text = ?2,
                    slug = ?3
                 WHERE id = ?4
                   AND author_id = ?5;",
                params![draft.title, draft.text, draft.slug, id, author],
            )
            .map_err(|err| map_unique_violation(err, &draft.slug))?;

        if changed == 0 {
            return Err(RepoError::NotFound(format!("note id={id}")));
        }
        Ok(())
    }

    fn delete_note(&self, author: UserId, id: NoteId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM notes WHERE id = ?1 AND author_id = ?2;",
            params![id, author],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(format!("note id={id}")));
        }
        Ok(())
    }

    fn find_by_slug(&self, author: UserId, slug: &str) -> RepoResult<Option<Note>> {
        let note = self
            .conn
            .query_row(
                &format!("{NOTE_SELECT_SQL} WHERE slug = ?1 AND author_id = ?2;"),
                params![slug, author],
                parse_note_row,
            )
            .optional()?;
        Ok(note)
    }

    fn list_by_author(&self, author: UserId) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL} WHERE author_id = ?1 ORDER BY id ASC;"
        ))?;
        let notes = stmt
            .query_map([author], parse_note_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(notes)
    }

    fn slug_exists(&self, slug: &str, exclude: Option<NoteId>) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM notes
                WHERE slug = ?1
                  AND (?2 IS NULL OR id <> ?2)
            );",
            params![slug, exclude],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn count_notes(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))?;
        u64::try_from(count).map_err(|_| RepoError::InvalidData(format!("negative count {count}")))
    }
}

fn parse_note_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get("id")?,
        title: row.get("title")?,
        text: row.get("text")?,
        slug: row.get("slug")?,
        author: row.get("author_id")?,
    })
}
