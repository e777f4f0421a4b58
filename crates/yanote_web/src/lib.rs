//! HTTP surface for YaNote.
//!
//! # Responsibility
//! - Map named routes to handlers.
//! - Translate service outcomes into redirects, pages and status codes.
//!
//! # Invariants
//! - Anonymous requests to login-only routes get `302` to the login page.
//! - Foreign or missing notes get `404`, never `403`.

pub mod error;
pub mod handlers;
pub mod pages;
pub mod routes;
pub mod server;
pub mod session;
pub mod state;

pub use error::{WebError, WebResult};
pub use routes::Route;
pub use server::NotesServer;
pub use state::AppState;

use axum::routing::get;
use axum::Router;
use handlers::{notes, users};

/// Builds the application router over `state`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(Route::Home.pattern(), get(notes::home))
        .route(Route::List.pattern(), get(notes::list))
        .route(Route::Add.pattern(), get(notes::add_page).post(notes::add))
        .route(Route::Success.pattern(), get(notes::success))
        .route(Route::Detail("").pattern(), get(notes::detail))
        .route(
            Route::Edit("").pattern(),
            get(notes::edit_page).post(notes::edit),
        )
        .route(
            Route::Delete("").pattern(),
            get(notes::delete_page).post(notes::delete),
        )
        .route(
            Route::Login.pattern(),
            get(users::login_page).post(users::login),
        )
        .route(
            Route::Signup.pattern(),
            get(users::signup_page).post(users::signup),
        )
        .route(
            Route::Logout.pattern(),
            get(users::logout).post(users::logout),
        )
        .fallback(|| async { WebError::NotFound })
        .with_state(state)
}
