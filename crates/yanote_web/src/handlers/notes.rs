//! `notes:*` handlers.
//!
//! Every handler except `home` takes `CurrentUser`, so anonymous requests are
//! redirected before any body is read. Lookups go through `NoteService`,
//! which turns foreign notes into `NotFound` (404).

use crate::error::{WebError, WebResult};
use crate::pages;
use crate::routes::Route;
use crate::session::{found, CurrentUser, MaybeUser};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use yanote_core::{FormErrors, Note, NoteForm, NoteServiceError, User};

/// GET `/` - public landing page.
pub async fn home(MaybeUser(user): MaybeUser) -> Html<String> {
    pages::home(user.as_ref())
}

/// GET `/notes/` - the requester's own notes.
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> WebResult<Html<String>> {
    let author = user.id;
    let notes = state
        .with_notes(move |notes| Ok(notes.list_notes(author)?))
        .await?;
    Ok(pages::note_list(&user, &notes))
}

/// GET `/add/` - empty note form.
pub async fn add_page(CurrentUser(user): CurrentUser) -> Html<String> {
    pages::note_form(
        &user,
        "Добавить заметку",
        &Route::Add.path(),
        &NoteForm::default(),
        &FormErrors::new(),
    )
}

/// POST `/add/` - create, then redirect to `notes:success`.
pub async fn add(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<NoteForm>,
) -> WebResult<Response> {
    let (author, submitted) = (user.id, form.clone());
    let outcome = state
        .with_notes(move |notes| Ok(notes.create_note(author, &submitted)))
        .await?;
    match outcome {
        Ok(_) => found(&Route::Success.path()),
        Err(NoteServiceError::Invalid(errors)) => Ok(pages::note_form(
            &user,
            "Добавить заметку",
            &Route::Add.path(),
            &form,
            &errors,
        )
        .into_response()),
        Err(other) => Err(other.into()),
    }
}

/// GET `/done/` - confirmation after a successful write.
pub async fn success(CurrentUser(user): CurrentUser) -> Html<String> {
    pages::success(&user)
}

/// GET `/note/:slug/`
pub async fn detail(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(slug): Path<String>,
) -> WebResult<Html<String>> {
    let note = owned_note(&state, &user, slug.clone()).await?;
    Ok(pages::note_detail(&user, &note))
}

/// GET `/edit/:slug/` - form prefilled with the stored note.
pub async fn edit_page(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(slug): Path<String>,
) -> WebResult<Html<String>> {
    let note = owned_note(&state, &user, slug.clone()).await?;
    let form = NoteForm::new(note.title, note.text, note.slug);
    Ok(pages::note_form(
        &user,
        "Редактировать заметку",
        &Route::Edit(&slug).path(),
        &form,
        &FormErrors::new(),
    ))
}

/// POST `/edit/:slug/` - update, then redirect to `notes:success`.
pub async fn edit(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(slug): Path<String>,
    Form(form): Form<NoteForm>,
) -> WebResult<Response> {
    let (author, current, submitted) = (user.id, slug.clone(), form.clone());
    let outcome = state
        .with_notes(move |notes| Ok(notes.update_note(author, &current, &submitted)))
        .await?;
    match outcome {
        Ok(_) => found(&Route::Success.path()),
        Err(NoteServiceError::Invalid(errors)) => Ok(pages::note_form(
            &user,
            "Редактировать заметку",
            &Route::Edit(&slug).path(),
            &form,
            &errors,
        )
        .into_response()),
        Err(other) => Err(WebError::from(other)),
    }
}

/// GET `/delete/:slug/` - confirmation page.
pub async fn delete_page(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(slug): Path<String>,
) -> WebResult<Html<String>> {
    let note = owned_note(&state, &user, slug.clone()).await?;
    Ok(pages::delete_confirm(&user, &note))
}

/// POST `/delete/:slug/` - delete, then redirect to `notes:success`.
pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(slug): Path<String>,
) -> WebResult<Response> {
    let author = user.id;
    state
        .with_notes(move |notes| Ok(notes.delete_note(author, &slug)?))
        .await?;
    found(&Route::Success.path())
}

async fn owned_note(state: &AppState, user: &User, slug: String) -> WebResult<Note> {
    let author = user.id;
    state
        .with_notes(move |notes| Ok(notes.get_note(author, &slug)?))
        .await
}
