//! Submitted form payloads and their field validation.
//!
//! # Responsibility
//! - Hold raw user input for note and account forms.
//! - Produce field-keyed errors instead of failing the request.
//!
//! # Invariants
//! - `clean` never consults storage; uniqueness checks live in services and
//!   report through the same `FormErrors` type.
//! - Text fields are trimmed before validation, bodies are not.

use crate::model::note::{NoteDraft, SLUG_MAX_CHARS, TITLE_MAX_CHARS};
use crate::model::user::USERNAME_MAX_CHARS;
use crate::slug::slugify;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Suffix appended to a conflicting slug in the `slug` field error.
pub const WARNING: &str = " - такой slug уже существует, придумайте уникальное значение!";
pub const REQUIRED: &str = "Обязательное поле.";
pub const INVALID_SLUG: &str =
    "Значение должно состоять только из латинских букв, цифр, знаков подчеркивания или дефиса.";
pub const PASSWORD_MISMATCH: &str = "Введенные пароли не совпадают.";
pub const USERNAME_TAKEN: &str = "Пользователь с таким именем уже существует.";
pub const INVALID_LOGIN: &str = "Пожалуйста, введите правильные имя пользователя и пароль.";

/// Key used for errors not tied to one field.
pub const NON_FIELD_ERRORS: &str = "__all__";

static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid slug regex"));

/// Field name -> ordered error messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: BTreeMap<&'static str, Vec<String>>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor for a single error.
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Messages for one field; empty when the field is valid.
    pub fn field(&self, field: &str) -> &[String] {
        self.fields.get(field).map_or(&[], Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[String])> {
        self.fields
            .iter()
            .map(|(field, messages)| (*field, messages.as_slice()))
    }

    fn into_result<T>(self, value: T) -> Result<T, FormErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl Display for FormErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in self.iter() {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                first = false;
                write!(f, "{field}: {message}")?;
            }
        }
        Ok(())
    }
}

/// Raw note create/edit submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NoteForm {
    pub title: String,
    pub text: String,
    pub slug: String,
}

impl NoteForm {
    pub fn new(
        title: impl Into<String>,
        text: impl Into<String>,
        slug: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            slug: slug.into(),
        }
    }

    /// Validates fields and derives the slug when left blank.
    ///
    /// A blank slug becomes `slugify(title)` truncated to the slug limit.
    /// Uniqueness is not checked here.
    pub fn clean(&self) -> Result<NoteDraft, FormErrors> {
        let mut errors = FormErrors::new();

        let title = self.title.trim();
        if title.is_empty() {
            errors.add("title", REQUIRED);
        } else {
            check_max_chars(&mut errors, "title", title, TITLE_MAX_CHARS);
        }

        if self.text.trim().is_empty() {
            errors.add("text", REQUIRED);
        }

        let supplied = self.slug.trim();
        let slug = if supplied.is_empty() {
            let derived: String = slugify(title).chars().take(SLUG_MAX_CHARS).collect();
            // Only meaningful when the title itself was valid.
            if !title.is_empty() && !SLUG_RE.is_match(&derived) {
                errors.add("slug", INVALID_SLUG);
            }
            derived
        } else {
            check_max_chars(&mut errors, "slug", supplied, SLUG_MAX_CHARS);
            if !SLUG_RE.is_match(supplied) {
                errors.add("slug", INVALID_SLUG);
            }
            supplied.to_string()
        };

        errors.into_result(NoteDraft {
            title: title.to_string(),
            text: self.text.clone(),
            slug,
        })
    }
}

/// Raw account registration submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    pub username: String,
    pub password1: String,
    pub password2: String,
}

impl SignupForm {
    pub fn new(
        username: impl Into<String>,
        password1: impl Into<String>,
        password2: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password1: password1.into(),
            password2: password2.into(),
        }
    }

    /// Field-level checks; returns the trimmed username on success.
    pub fn clean(&self) -> Result<String, FormErrors> {
        let mut errors = FormErrors::new();

        let username = clean_username(&mut errors, &self.username);

        if self.password1.is_empty() {
            errors.add("password1", REQUIRED);
        }
        if self.password2.is_empty() {
            errors.add("password2", REQUIRED);
        } else if !self.password1.is_empty() && self.password1 != self.password2 {
            errors.add("password2", PASSWORD_MISMATCH);
        }

        errors.into_result(username)
    }
}

/// Account fields for administrative creation, where no confirmation field
/// exists.
pub fn clean_account(username: &str, password: &str) -> Result<String, FormErrors> {
    let mut errors = FormErrors::new();
    let username = clean_username(&mut errors, username);
    if password.is_empty() {
        errors.add("password", REQUIRED);
    }
    errors.into_result(username)
}

fn clean_username(errors: &mut FormErrors, raw: &str) -> String {
    let username = raw.trim();
    if username.is_empty() {
        errors.add("username", REQUIRED);
    } else {
        check_max_chars(errors, "username", username, USERNAME_MAX_CHARS);
    }
    username.to_string()
}

/// Raw login submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

fn check_max_chars(errors: &mut FormErrors, field: &'static str, value: &str, max: usize) {
    let count = value.chars().count();
    if count > max {
        errors.add(
            field,
            format!("Убедитесь, что это значение содержит не более {max} символов (сейчас {count})."),
        );
    }
}
