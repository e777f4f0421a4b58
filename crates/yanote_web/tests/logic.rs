mod common;

use axum::http::StatusCode;
use common::{assert_redirects, body_text, issued_token, Client, Harness, PASSWORD};
use yanote_core::{slugify, WARNING};
use yanote_web::Route;

const FORM: [(&str, &str); 3] = [
    ("title", "Новая заметка"),
    ("text", "Текст новой заметки"),
    ("slug", "novaya-zametka"),
];

async fn harness() -> Harness {
    Harness::new("Заметка", "Текст заметки").await
}

#[tokio::test]
async fn user_can_create_note() {
    let h = harness().await;
    let response = h.post(Client::Author, &Route::Add.path(), &FORM).await;

    assert_redirects(&response, &Route::Success.path());
    assert_eq!(h.note_count().await, 2);
    let created = h.stored_note(&h.author, "novaya-zametka").await.unwrap();
    assert_eq!(created.title, "Новая заметка");
    assert_eq!(created.text, "Текст новой заметки");
    assert_eq!(created.author, h.author.id);
}

#[tokio::test]
async fn anonymous_user_cant_create_note() {
    let h = harness().await;
    let url = Route::Add.path();
    let response = h.post(Client::Anonymous, &url, &FORM).await;

    assert_redirects(&response, &format!("/auth/login/?next={url}"));
    assert_eq!(h.note_count().await, 1);
}

#[tokio::test]
async fn not_unique_slug_is_a_form_error() {
    let h = harness().await;
    let form = [
        ("title", "Новая заметка"),
        ("text", "Текст новой заметки"),
        ("slug", h.note.slug.as_str()),
    ];
    let response = h.post(Client::Author, &Route::Add.path(), &form).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains(&format!("{}{WARNING}", h.note.slug)));
    assert_eq!(h.note_count().await, 1);
}

#[tokio::test]
async fn empty_slug_is_derived_from_title() {
    let h = harness().await;
    let form = [("title", "Новая заметка"), ("text", "Текст новой заметки")];
    let response = h.post(Client::Author, &Route::Add.path(), &form).await;

    assert_redirects(&response, &Route::Success.path());
    assert_eq!(h.note_count().await, 2);
    let expected_slug = slugify("Новая заметка");
    assert!(h.stored_note(&h.author, &expected_slug).await.is_some());
}

#[tokio::test]
async fn author_can_edit_note() {
    let h = harness().await;
    let response = h
        .post(Client::Author, &Route::Edit(&h.note.slug).path(), &FORM)
        .await;

    assert_redirects(&response, &Route::Success.path());
    let edited = h.stored_note(&h.author, "novaya-zametka").await.unwrap();
    assert_eq!(edited.id, h.note.id);
    assert_eq!(edited.title, "Новая заметка");
    assert_eq!(edited.text, "Текст новой заметки");
}

#[tokio::test]
async fn other_user_cant_edit_note() {
    let h = harness().await;
    let response = h
        .post(Client::NotAuthor, &Route::Edit(&h.note.slug).path(), &FORM)
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(h.stored_note(&h.author, &h.note.slug).await, Some(h.note.clone()));
}

#[tokio::test]
async fn author_can_delete_note() {
    let h = harness().await;
    let response = h
        .post(Client::Author, &Route::Delete(&h.note.slug).path(), &[])
        .await;

    assert_redirects(&response, &Route::Success.path());
    assert_eq!(h.note_count().await, 0);
}

#[tokio::test]
async fn other_user_cant_delete_note() {
    let h = harness().await;
    let response = h
        .post(Client::NotAuthor, &Route::Delete(&h.note.slug).path(), &[])
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(h.note_count().await, 1);
}

#[tokio::test]
async fn login_follows_next_and_session_grants_access() {
    let h = harness().await;
    let response = h
        .post(
            Client::Anonymous,
            "/auth/login/?next=/add/",
            &[("username", "author"), ("password", PASSWORD)],
        )
        .await;

    assert_redirects(&response, "/add/");
    let token = issued_token(&response).unwrap();
    let user = h
        .state
        .with_auth(move |auth| Ok(auth.resolve_session(&token)?))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.id, h.author.id);
}

#[tokio::test]
async fn login_ignores_off_site_next() {
    let h = harness().await;
    let response = h
        .post(
            Client::Anonymous,
            "/auth/login/?next=//evil.example/",
            &[("username", "author"), ("password", PASSWORD)],
        )
        .await;
    assert_redirects(&response, &Route::List.path());
}

#[tokio::test]
async fn wrong_password_rerenders_login_form() {
    let h = harness().await;
    let response = h
        .post(
            Client::Anonymous,
            &Route::Login.path(),
            &[("username", "author"), ("password", "wrong")],
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(issued_token(&response).is_none());
    let body = body_text(response).await;
    assert!(body.contains(yanote_core::form::INVALID_LOGIN));
}

#[tokio::test]
async fn signup_then_login() {
    let h = harness().await;
    let fields = [
        ("username", "newcomer"),
        ("password1", "s3cret!"),
        ("password2", "s3cret!"),
    ];
    let response = h
        .post(Client::Anonymous, &Route::Signup.path(), &fields)
        .await;
    assert_redirects(&response, &Route::Login.path());

    let response = h
        .post(
            Client::Anonymous,
            &Route::Login.path(),
            &[("username", "newcomer"), ("password", "s3cret!")],
        )
        .await;
    assert_redirects(&response, &Route::List.path());
}

#[tokio::test]
async fn signup_rejects_taken_username() {
    let h = harness().await;
    let fields = [
        ("username", "author"),
        ("password1", "x"),
        ("password2", "x"),
    ];
    let response = h
        .post(Client::Anonymous, &Route::Signup.path(), &fields)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains(yanote_core::form::USERNAME_TAKEN));
}

#[tokio::test]
async fn logout_ends_session() {
    let h = harness().await;
    let response = h.post(Client::Author, &Route::Logout.path(), &[]).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = h.get(Client::Author, &Route::List.path()).await;
    assert_redirects(&response, "/auth/login/?next=/notes/");
}

#[tokio::test]
async fn signup_rejects_mismatched_passwords() {
    let h = harness().await;
    let fields = [
        ("username", "newcomer"),
        ("password1", "s3cret!"),
        ("password2", "other"),
    ];
    let response = h
        .post(Client::Anonymous, &Route::Signup.path(), &fields)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains(yanote_core::form::PASSWORD_MISMATCH));

    let response = h
        .post(
            Client::Anonymous,
            &Route::Login.path(),
            &[("username", "newcomer"), ("password", "s3cret!")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(issued_token(&response).is_none());
}

#[tokio::test]
async fn note_with_untransliterable_title_saves_unchanged_from_edit_form() {
    let h = harness().await;
    let form = [("title", "Café"), ("text", "body")];
    let response = h.post(Client::Author, &Route::Add.path(), &form).await;
    assert_redirects(&response, &Route::Success.path());

    let stored = h.stored_note(&h.author, "caf").await.unwrap();
    let edit_url = Route::Edit(&stored.slug).path();
    let body = body_text(h.get(Client::Author, &edit_url).await).await;
    assert!(body.contains(r#"value="caf""#));

    let resubmitted = [("title", "Café"), ("text", "body"), ("slug", "caf")];
    let response = h.post(Client::Author, &edit_url, &resubmitted).await;
    assert_redirects(&response, &Route::Success.path());
    assert_eq!(h.stored_note(&h.author, "caf").await, Some(stored));
}

#[tokio::test]
async fn login_returns_to_percent_encoded_next() {
    let h = harness().await;
    let response = h
        .post(
            Client::Anonymous,
            "/auth/login/?next=/note/caf%25C3%25A9/",
            &[("username", "author"), ("password", PASSWORD)],
        )
        .await;
    assert_redirects(&response, "/note/caf%C3%A9/");
}
