//! Core domain logic for YaNote.
//! This crate is the single source of truth for note ownership and slug rules.

pub mod db;
pub mod form;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod slug;

pub use form::{FormErrors, LoginForm, NoteForm, SignupForm, WARNING};
pub use logging::{default_log_level, init_console_logging, init_logging, logging_status};
pub use model::note::{Note, NoteDraft, NoteId};
pub use model::user::{User, UserId};
pub use repo::note_repo::{NoteRepository, SqliteNoteRepository};
pub use repo::session_repo::{SessionRepository, SqliteSessionRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::auth_service::{AuthError, AuthService, LoginOutcome, PasswordCost};
pub use service::note_service::{NoteService, NoteServiceError};
pub use slug::slugify;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
