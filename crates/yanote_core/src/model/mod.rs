//! Domain model for users and the notes they own.
//!
//! # Invariants
//! - Every note has exactly one author; ownership never changes after create.
//! - `Note::slug` is unique across all authors.

pub mod note;
pub mod user;
