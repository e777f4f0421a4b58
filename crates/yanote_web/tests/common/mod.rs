//! Test harness: an in-memory app with four accounts and one authored note.

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use tower::ServiceExt;
use yanote_core::db::open_db_in_memory;
use yanote_core::{Note, NoteForm, PasswordCost, User};
use yanote_web::session::SESSION_COOKIE;
use yanote_web::{build_router, AppState};

pub const PASSWORD: &str = "password";

const FAST_COST: PasswordCost = PasswordCost {
    memory_kib: 8,
    iterations: 1,
};

/// Who is sending the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Client {
    Anonymous,
    Author,
    NotAuthor,
    Admin,
    Another,
}

pub struct Harness {
    pub state: AppState,
    pub router: Router,
    pub author: User,
    pub not_author: User,
    pub note: Note,
    tokens: Vec<(Client, String)>,
}

impl Harness {
    /// Seeds the accounts and one note titled `note_title` owned by `author`.
    pub async fn new(note_title: &str, note_text: &str) -> Self {
        let state = AppState::new(open_db_in_memory().unwrap(), FAST_COST);

        let (author, not_author, tokens) = state
            .with_auth(|auth| {
                let author = auth.create_user("author", PASSWORD)?;
                let not_author = auth.create_user("not_author", PASSWORD)?;
                auth.create_superuser("admin", PASSWORD)?;
                auth.create_user("Другой пользователь", PASSWORD)?;

                let mut tokens = Vec::new();
                for (client, username) in [
                    (Client::Author, "author"),
                    (Client::NotAuthor, "not_author"),
                    (Client::Admin, "admin"),
                    (Client::Another, "Другой пользователь"),
                ] {
                    tokens.push((client, auth.login(username, PASSWORD)?.token));
                }
                Ok((author, not_author, tokens))
            })
            .await
            .unwrap();

        let (author_id, form) = (author.id, NoteForm::new(note_title, note_text, ""));
        let note = state
            .with_notes(move |notes| Ok(notes.create_note(author_id, &form)?))
            .await
            .unwrap();

        Self {
            router: build_router(state.clone()),
            state,
            author,
            not_author,
            note,
            tokens,
        }
    }

    pub fn token(&self, client: Client) -> Option<&str> {
        self.tokens
            .iter()
            .find(|(owner, _)| *owner == client)
            .map(|(_, token)| token.as_str())
    }

    pub async fn get(&self, client: Client, path: &str) -> Response {
        self.send(client, Method::GET, path, None).await
    }

    pub async fn post(&self, client: Client, path: &str, fields: &[(&str, &str)]) -> Response {
        self.send(client, Method::POST, path, Some(fields)).await
    }

    pub async fn send(
        &self,
        client: Client,
        method: Method,
        path: &str,
        fields: Option<&[(&str, &str)]>,
    ) -> Response {
        let mut request = Request::builder().method(method).uri(path);
        if let Some(token) = self.token(client) {
            request = request.header(COOKIE, format!("{SESSION_COOKIE}={token}"));
        }
        let body = match fields {
            Some(fields) => {
                request = request.header(CONTENT_TYPE, "application/x-www-form-urlencoded");
                Body::from(encode_form(fields))
            }
            None => Body::empty(),
        };
        self.router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap()
    }

    pub async fn note_count(&self) -> u64 {
        self.state
            .with_notes(|notes| Ok(notes.count_notes()?))
            .await
            .unwrap()
    }

    /// Reads a note as `author`; `None` when missing or foreign.
    pub async fn stored_note(&self, author: &User, slug: &str) -> Option<Note> {
        let (author_id, slug) = (author.id, slug.to_string());
        self.state
            .with_notes(move |notes| Ok(notes.get_note(author_id, &slug).ok()))
            .await
            .unwrap()
    }
}

pub fn encode_form(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(name, value)| format!("{name}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

pub async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Asserts a `302 Found` to exactly `expected`.
pub fn assert_redirects(response: &Response, expected: &str) {
    assert_eq!(response.status(), StatusCode::FOUND);
    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok());
    assert_eq!(location, Some(expected));
}

/// Returns the session token installed by `Set-Cookie`, if any.
pub fn issued_token(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}
