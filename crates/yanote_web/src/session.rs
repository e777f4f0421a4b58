//! Session cookie handling and requester extractors.
//!
//! # Responsibility
//! - Read/write the `yanote_session` cookie.
//! - Resolve the requester for handlers: `CurrentUser` for login-only pages,
//!   `MaybeUser` for public ones.
//!
//! # Invariants
//! - A missing, unknown or revoked token on a login-only page always yields
//!   `302 Found` to the login page with `next` set to the original URL.

use crate::error::{WebError, WebResult};
use crate::routes::login_redirect_target;
use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::header::{COOKIE, LOCATION, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use yanote_core::User;

pub const SESSION_COOKIE: &str = "yanote_session";

/// Authenticated requester. Rejects anonymous requests with a login redirect.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Requester on public pages; `None` for anonymous visitors.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

#[axum::async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(&parts.headers) else {
            return Ok(Self(None));
        };
        let user = state
            .with_auth(move |auth| Ok(auth.resolve_session(&token)?))
            .await?;
        Ok(Self(user))
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let MaybeUser(user) = MaybeUser::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        match user {
            Some(user) => Ok(Self(user)),
            None => {
                let original = parts
                    .uri
                    .path_and_query()
                    .map_or_else(|| parts.uri.path(), |pq| pq.as_str());
                Err(found(&login_redirect_target(original))
                    .unwrap_or_else(IntoResponse::into_response))
            }
        }
    }
}

/// Extracts the session token from the `Cookie` header, if any.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value that installs a session token.
pub fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/")
}

/// `Set-Cookie` value that clears the session cookie.
pub fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0")
}

/// `302 Found` to `location`.
pub fn found(location: &str) -> WebResult<Response> {
    let mut response = StatusCode::FOUND.into_response();
    response
        .headers_mut()
        .insert(LOCATION, HeaderValue::from_str(location)?);
    Ok(response)
}

/// Adds a `Set-Cookie` header to `response`.
pub fn with_cookie(mut response: Response, cookie: &str) -> WebResult<Response> {
    response
        .headers_mut()
        .append(SET_COOKIE, HeaderValue::from_str(cookie)?);
    Ok(response)
}
