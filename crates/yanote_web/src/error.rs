//! HTTP-facing error type.
//!
//! Not-found renders a 404 page; every other failure is logged and answered
//! with a generic 500 so storage details never reach the client.

use crate::pages;
use axum::http::header::InvalidHeaderValue;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;
use std::error::Error;
use std::fmt::{Display, Formatter};
use tokio::task::JoinError;
use yanote_core::{AuthError, NoteServiceError, RepoError};

pub type WebResult<T> = Result<T, WebError>;

#[derive(Debug)]
pub enum WebError {
    /// Resource missing or owned by someone else.
    NotFound,
    Note(NoteServiceError),
    Auth(AuthError),
    Repo(RepoError),
    /// A handler panicked while holding the connection lock.
    StatePoisoned,
    /// The blocking-pool task running a storage call panicked or was cancelled.
    Blocking(JoinError),
    /// A redirect target or cookie could not be encoded as a header value.
    InvalidHeader(InvalidHeaderValue),
}

impl Display for WebError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::Note(err) => write!(f, "{err}"),
            Self::Auth(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::StatePoisoned => write!(f, "connection lock poisoned"),
            Self::Blocking(err) => write!(f, "storage task failed: {err}"),
            Self::InvalidHeader(err) => write!(f, "invalid header value: {err}"),
        }
    }
}

impl Error for WebError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Note(err) => Some(err),
            Self::Auth(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Blocking(err) => Some(err),
            Self::InvalidHeader(err) => Some(err),
            Self::NotFound | Self::StatePoisoned => None,
        }
    }
}

impl From<NoteServiceError> for WebError {
    fn from(value: NoteServiceError) -> Self {
        match value {
            NoteServiceError::NoteNotFound(_) => Self::NotFound,
            other => Self::Note(other),
        }
    }
}

impl From<AuthError> for WebError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

impl From<RepoError> for WebError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<InvalidHeaderValue> for WebError {
    fn from(value: InvalidHeaderValue) -> Self {
        Self::InvalidHeader(value)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => (StatusCode::NOT_FOUND, pages::not_found()).into_response(),
            other => {
                error!("event=request_failed module=web status=error error={other}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    pages::server_error(),
                )
                    .into_response()
            }
        }
    }
}
