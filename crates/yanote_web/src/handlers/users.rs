//! `users:*` handlers: login, signup, logout.
//!
//! All three pages answer `200 OK` to anyone, signed in or not.

use crate::error::WebResult;
use crate::pages;
use crate::routes::{safe_next, Route};
use crate::session::{
    expired_session_cookie, found, session_cookie, session_token, with_cookie, MaybeUser,
};
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use serde::Deserialize;
use yanote_core::form::{INVALID_LOGIN, NON_FIELD_ERRORS};
use yanote_core::{AuthError, FormErrors, LoginForm, SignupForm};

/// `?next=` carried through the login flow.
#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// GET `/auth/login/`
pub async fn login_page(
    MaybeUser(user): MaybeUser,
    Query(query): Query<NextQuery>,
) -> Html<String> {
    pages::login(user.as_ref(), "", query.next.as_deref(), &FormErrors::new())
}

/// POST `/auth/login/` - open a session and follow `next`.
pub async fn login(
    State(state): State<AppState>,
    Query(query): Query<NextQuery>,
    Form(form): Form<LoginForm>,
) -> WebResult<Response> {
    let (username, password) = (form.username.clone(), form.password);
    let outcome = state
        .with_auth(move |auth| Ok(auth.login(&username, &password)))
        .await?;
    match outcome {
        Ok(outcome) => {
            let target = safe_next(query.next.as_deref());
            with_cookie(found(&target)?, &session_cookie(&outcome.token))
        }
        Err(AuthError::InvalidCredentials) => Ok(pages::login(
            None,
            &form.username,
            query.next.as_deref(),
            &FormErrors::single(NON_FIELD_ERRORS, INVALID_LOGIN),
        )
        .into_response()),
        Err(other) => Err(other.into()),
    }
}

/// GET `/auth/signup/`
pub async fn signup_page(MaybeUser(user): MaybeUser) -> Html<String> {
    pages::signup(user.as_ref(), "", &FormErrors::new())
}

/// POST `/auth/signup/` - register, then send the user to log in.
pub async fn signup(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> WebResult<Response> {
    let submitted = form.clone();
    let outcome = state
        .with_auth(move |auth| Ok(auth.signup(&submitted)))
        .await?;
    match outcome {
        Ok(_) => found(&Route::Login.path()),
        Err(AuthError::Invalid(errors)) => {
            Ok(pages::signup(None, &form.username, &errors).into_response())
        }
        Err(other) => Err(other.into()),
    }
}

/// GET or POST `/auth/logout/` - end the session if there is one.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> WebResult<Response> {
    if let Some(token) = session_token(&headers) {
        state
            .with_auth(move |auth| Ok(auth.logout(&token)?))
            .await?;
    }
    with_cookie(
        pages::logged_out().into_response(),
        &expired_session_cookie(),
    )
}
