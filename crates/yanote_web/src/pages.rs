//! Minimal HTML pages.
//!
//! Every user-supplied value goes through `escape` before it reaches markup.

use crate::routes::Route;
use axum::response::Html;
use yanote_core::{FormErrors, Note, NoteForm, User};

/// Escapes text for use in HTML bodies and double-quoted attributes.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

fn layout(title: &str, user: Option<&User>, body: &str) -> Html<String> {
    let nav = match user {
        Some(user) => format!(
            r#"<a href="{list}">Мои заметки</a> <a href="{add}">Добавить</a> <span>{name}</span> <a href="{logout}">Выйти</a>"#,
            list = Route::List.path(),
            add = Route::Add.path(),
            name = escape(&user.username),
            logout = Route::Logout.path(),
        ),
        None => format!(
            r#"<a href="{login}">Войти</a> <a href="{signup}">Регистрация</a>"#,
            login = Route::Login.path(),
            signup = Route::Signup.path(),
        ),
    };
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"ru\">\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body>\n<nav><a href=\"{home}\">YaNote</a> {nav}</nav>\n<main>\n{body}\n</main>\n</body>\n</html>\n",
        title = escape(title),
        home = Route::Home.path(),
    ))
}

fn error_list(errors: &FormErrors, field: &str) -> String {
    let messages = errors.field(field);
    if messages.is_empty() {
        return String::new();
    }
    let items: String = messages
        .iter()
        .map(|message| format!("<li>{}</li>", escape(message)))
        .collect();
    format!(r#"<ul class="errorlist" data-field="{field}">{items}</ul>"#)
}

fn text_input(name: &str, label: &str, value: &str, input_type: &str, errors: &FormErrors) -> String {
    format!(
        r#"<p><label for="id_{name}">{label}</label>{errors}<input type="{input_type}" name="{name}" id="id_{name}" value="{value}"></p>"#,
        errors = error_list(errors, name),
        value = escape(value),
    )
}

pub fn home(user: Option<&User>) -> Html<String> {
    layout(
        "YaNote",
        user,
        "<h1>YaNote</h1>\n<p>Простой сервис для заметок.</p>",
    )
}

pub fn note_list(user: &User, notes: &[Note]) -> Html<String> {
    let items: String = notes
        .iter()
        .map(|note| {
            format!(
                r#"<li data-slug="{slug}"><a href="{href}">{title}</a></li>"#,
                slug = escape(&note.slug),
                href = Route::Detail(&note.slug).path(),
                title = escape(&note.title),
            )
        })
        .collect();
    let body = if notes.is_empty() {
        "<h1>Мои заметки</h1>\n<p>Заметок пока нет.</p>".to_string()
    } else {
        format!("<h1>Мои заметки</h1>\n<ul class=\"object_list\">{items}</ul>")
    };
    layout("Мои заметки", Some(user), &body)
}

/// Create/edit form; `action` is where the form posts.
pub fn note_form(user: &User, heading: &str, action: &str, form: &NoteForm, errors: &FormErrors) -> Html<String> {
    let body = format!(
        r#"<h1>{heading}</h1>
<form method="post" action="{action}" id="note-form">
{title}
<p><label for="id_text">Текст</label>{text_errors}<textarea name="text" id="id_text">{text}</textarea></p>
{slug}
<button type="submit">Сохранить</button>
</form>"#,
        heading = escape(heading),
        action = escape(action),
        title = text_input("title", "Заголовок", &form.title, "text", errors),
        text_errors = error_list(errors, "text"),
        text = escape(&form.text),
        slug = text_input("slug", "Адрес для страницы с заметкой", &form.slug, "text", errors),
    );
    layout(heading, Some(user), &body)
}

pub fn note_detail(user: &User, note: &Note) -> Html<String> {
    let body = format!(
        r#"<article data-slug="{slug}">
<h1>{title}</h1>
<p>{text}</p>
<a href="{edit}">Редактировать</a> <a href="{delete}">Удалить</a>
</article>"#,
        slug = escape(&note.slug),
        title = escape(&note.title),
        text = escape(&note.text),
        edit = Route::Edit(&note.slug).path(),
        delete = Route::Delete(&note.slug).path(),
    );
    layout(&note.title, Some(user), &body)
}

pub fn delete_confirm(user: &User, note: &Note) -> Html<String> {
    let body = format!(
        r#"<h1>Удалить заметку «{title}»?</h1>
<form method="post" action="{action}"><button type="submit">Удалить</button></form>"#,
        title = escape(&note.title),
        action = Route::Delete(&note.slug).path(),
    );
    layout("Удаление заметки", Some(user), &body)
}

pub fn success(user: &User) -> Html<String> {
    let body = format!(
        r#"<h1>Успешно!</h1>
<p>Операция выполнена.</p>
<a href="{list}">К списку заметок</a>"#,
        list = Route::List.path(),
    );
    layout("Успешно", Some(user), &body)
}

/// Login form; `next` is echoed into the form action so it survives the POST.
pub fn login(user: Option<&User>, username: &str, next: Option<&str>, errors: &FormErrors) -> Html<String> {
    let action = match next {
        Some(next) => format!(
            "{}?next={}",
            Route::Login.path(),
            urlencoding::encode(next)
        ),
        None => Route::Login.path(),
    };
    let body = format!(
        r#"<h1>Вход</h1>
<form method="post" action="{action}" id="login-form">
{non_field}
{username}
<p><label for="id_password">Пароль</label><input type="password" name="password" id="id_password"></p>
<button type="submit">Войти</button>
</form>"#,
        action = escape(&action),
        non_field = error_list(errors, yanote_core::form::NON_FIELD_ERRORS),
        username = text_input("username", "Имя пользователя", username, "text", errors),
    );
    layout("Вход", user, &body)
}

pub fn signup(user: Option<&User>, username: &str, errors: &FormErrors) -> Html<String> {
    let body = format!(
        r#"<h1>Регистрация</h1>
<form method="post" action="{action}" id="signup-form">
{username}
{password1}
{password2}
<button type="submit">Зарегистрироваться</button>
</form>"#,
        action = Route::Signup.path(),
        username = text_input("username", "Имя пользователя", username, "text", errors),
        password1 = text_input("password1", "Пароль", "", "password", errors),
        password2 = text_input("password2", "Подтверждение пароля", "", "password", errors),
    );
    layout("Регистрация", user, &body)
}

pub fn logged_out() -> Html<String> {
    layout(
        "Выход",
        None,
        "<h1>Вы вышли из своей учётной записи.</h1>",
    )
}

pub fn not_found() -> Html<String> {
    layout("Страница не найдена", None, "<h1>404</h1>\n<p>Страница не найдена.</p>")
}

pub fn server_error() -> Html<String> {
    layout("Ошибка сервера", None, "<h1>500</h1>\n<p>Внутренняя ошибка сервера.</p>")
}
