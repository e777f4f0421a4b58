//! Note use-case service.
//!
//! # Responsibility
//! - Provide ownership-scoped list/get/create/update/delete for notes.
//! - Run form validation and slug-uniqueness checks before writes.
//!
//! # Invariants
//! - A note owned by someone else is reported as `NoteNotFound`, never as a
//!   permission failure.
//! - A slug held by another note fails with `<slug>` + `WARNING` on the
//!   `slug` field; the stored note is left untouched.
//! - Superuser status does not widen visibility.

use crate::form::{FormErrors, NoteForm, WARNING};
use crate::model::note::{Note, NoteId};
use crate::model::user::UserId;
use crate::repo::note_repo::NoteRepository;
use crate::repo::{RepoError, RepoResult};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Note is missing or belongs to another author.
    NoteNotFound(String),
    /// Submitted form did not validate.
    Invalid(FormErrors),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoteNotFound(slug) => write!(f, "note not found: {slug}"),
            Self::Invalid(errors) => write!(f, "invalid note form: {errors}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(key) => Self::NoteNotFound(key),
            // Lost a race against a concurrent writer for the same slug.
            RepoError::Conflict(slug) => Self::Invalid(slug_taken_errors(&slug)),
            other => Self::Repo(other),
        }
    }
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists notes owned by `author`.
    pub fn list_notes(&self, author: UserId) -> RepoResult<Vec<Note>> {
        self.repo.list_by_author(author)
    }

    /// Gets one note by slug if `author` owns it.
    pub fn get_note(&self, author: UserId, slug: &str) -> Result<Note, NoteServiceError> {
        self.repo
            .find_by_slug(author, slug)?
            .ok_or_else(|| NoteServiceError::NoteNotFound(slug.to_string()))
    }

    /// Validates `form` and stores a new note owned by `author`.
    ///
    /// A blank slug is derived from the title.
    pub fn create_note(&self, author: UserId, form: &NoteForm) -> Result<Note, NoteServiceError> {
        let draft = form.clean().map_err(NoteServiceError::Invalid)?;
        self.ensure_slug_free(&draft.slug, None)?;

        let note = self.repo.create_note(author, &draft)?;
        info!(
            "event=note_create module=note_service status=ok note_id={} author_id={}",
            note.id, author
        );
        Ok(note)
    }

    /// Replaces title/text/slug of the note `slug` owned by `author`.
    ///
    /// Ownership is checked before the form, so a foreign note is not-found
    /// even when the submission is invalid.
    pub fn update_note(
        &self,
        author: UserId,
        slug: &str,
        form: &NoteForm,
    ) -> Result<Note, NoteServiceError> {
        let existing = self.get_note(author, slug)?;
        let draft = form.clean().map_err(NoteServiceError::Invalid)?;
        self.ensure_slug_free(&draft.slug, Some(existing.id))?;

        self.repo.update_note(author, existing.id, &draft)?;
        info!(
            "event=note_update module=note_service status=ok note_id={} author_id={}",
            existing.id, author
        );
        Ok(Note {
            id: existing.id,
            title: draft.title,
            text: draft.text,
            slug: draft.slug,
            author,
        })
    }

    /// Deletes the note `slug` owned by `author`.
    pub fn delete_note(&self, author: UserId, slug: &str) -> Result<Note, NoteServiceError> {
        let existing = self.get_note(author, slug)?;
        self.repo.delete_note(author, existing.id)?;
        info!(
            "event=note_delete module=note_service status=ok note_id={} author_id={}",
            existing.id, author
        );
        Ok(existing)
    }

    /// Counts notes across all authors.
    pub fn count_notes(&self) -> RepoResult<u64> {
        self.repo.count_notes()
    }

    fn ensure_slug_free(&self, slug: &str, exclude: Option<NoteId>) -> Result<(), NoteServiceError> {
        if self.repo.slug_exists(slug, exclude)? {
            warn!("event=note_slug_conflict module=note_service status=rejected");
            return Err(NoteServiceError::Invalid(slug_taken_errors(slug)));
        }
        Ok(())
    }
}

fn slug_taken_errors(slug: &str) -> FormErrors {
    FormErrors::single("slug", format!("{slug}{WARNING}"))
}
