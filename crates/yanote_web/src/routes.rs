//! Named routes and their reverse lookup.
//!
//! # Responsibility
//! - Give every endpoint a stable name (`notes:list`, `users:login`, ...).
//! - Build concrete paths from names so handlers never hardcode URLs.
//!
//! # Invariants
//! - `Route::pattern` and `Route::path` describe the same URL shape.
//! - Slugs are percent-encoded when placed into a path.

/// Every endpoint the application serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    Home,
    List,
    Add,
    Success,
    Detail(&'a str),
    Edit(&'a str),
    Delete(&'a str),
    Login,
    Signup,
    Logout,
}

impl Route<'_> {
    /// Namespaced route name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Home => "notes:home",
            Self::List => "notes:list",
            Self::Add => "notes:add",
            Self::Success => "notes:success",
            Self::Detail(_) => "notes:detail",
            Self::Edit(_) => "notes:edit",
            Self::Delete(_) => "notes:delete",
            Self::Login => "users:login",
            Self::Signup => "users:signup",
            Self::Logout => "users:logout",
        }
    }

    /// Router pattern with `:slug` placeholders.
    pub fn pattern(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::List => "/notes/",
            Self::Add => "/add/",
            Self::Success => "/done/",
            Self::Detail(_) => "/note/:slug/",
            Self::Edit(_) => "/edit/:slug/",
            Self::Delete(_) => "/delete/:slug/",
            Self::Login => "/auth/login/",
            Self::Signup => "/auth/signup/",
            Self::Logout => "/auth/logout/",
        }
    }

    /// Concrete path for this route.
    pub fn path(&self) -> String {
        match self {
            Self::Detail(slug) | Self::Edit(slug) | Self::Delete(slug) => self
                .pattern()
                .replace(":slug", &urlencoding::encode(slug)),
            _ => self.pattern().to_string(),
        }
    }

    /// Whether anonymous requests are sent to the login page.
    pub fn requires_login(&self) -> bool {
        !matches!(
            self,
            Self::Home | Self::Login | Self::Signup | Self::Logout
        )
    }
}

/// Login URL carrying `next` so the user lands back on `original`.
///
/// `original` is a path with optional query; everything except `/` is
/// percent-encoded.
pub fn login_redirect_target(original: &str) -> String {
    let next = original
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");
    format!("{}?next={next}", Route::Login.path())
}

/// Returns `next` when it is a local absolute path, otherwise the note list.
///
/// Rejects scheme-relative (`//host`) and backslash tricks that browsers
/// treat as off-site.
pub fn safe_next(next: Option<&str>) -> String {
    match next {
        Some(value)
            if value.starts_with('/')
                && !value.starts_with("//")
                && !value.starts_with("/\\") =>
        {
            value.to_string()
        }
        _ => Route::List.path(),
    }
}
