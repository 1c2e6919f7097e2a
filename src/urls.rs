//! Named routes.
//!
//! Route patterns are registered once (the `*_PATTERN` constants) and every
//! redirect or test builds concrete paths through [`Route::path`], so a path
//! change never leaves a stale literal behind.

pub const NEWS_HOME: &str = "/news";
pub const NEWS_DETAIL_PATTERN: &str = "/news/{id}";
pub const NEWS_EDIT_PATTERN: &str = "/news/comments/{id}/edit";
pub const NEWS_DELETE_PATTERN: &str = "/news/comments/{id}/delete";

pub const NOTES_HOME: &str = "/notes";
pub const NOTES_LIST: &str = "/notes/list";
pub const NOTES_ADD: &str = "/notes/add";
pub const NOTES_DETAIL_PATTERN: &str = "/notes/note/{slug}";
pub const NOTES_EDIT_PATTERN: &str = "/notes/edit/{slug}";
pub const NOTES_DELETE_PATTERN: &str = "/notes/delete/{slug}";
pub const NOTES_SUCCESS: &str = "/notes/done";

pub const LOGIN: &str = "/auth/login";
pub const LOGOUT: &str = "/auth/logout";
pub const SIGNUP: &str = "/auth/signup";

/// Anchor of the comment block on a news detail page.
pub const COMMENTS_ANCHOR: &str = "#comments";

/// Route
///
/// A named route with its arguments, e.g. `Route::NotesEdit("my-note")`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    NewsHome,
    NewsDetail(i64),
    NewsEdit(i64),
    NewsDelete(i64),
    NotesHome,
    NotesList,
    NotesAdd,
    NotesDetail(&'a str),
    NotesEdit(&'a str),
    NotesDelete(&'a str),
    NotesSuccess,
    Login,
    Logout,
    Signup,
}

impl Route<'_> {
    /// The concrete path of this route.
    pub fn path(&self) -> String {
        match *self {
            Route::NewsHome => NEWS_HOME.to_string(),
            Route::NewsDetail(id) => format!("/news/{id}"),
            Route::NewsEdit(id) => format!("/news/comments/{id}/edit"),
            Route::NewsDelete(id) => format!("/news/comments/{id}/delete"),
            Route::NotesHome => NOTES_HOME.to_string(),
            Route::NotesList => NOTES_LIST.to_string(),
            Route::NotesAdd => NOTES_ADD.to_string(),
            Route::NotesDetail(slug) => format!("/notes/note/{slug}"),
            Route::NotesEdit(slug) => format!("/notes/edit/{slug}"),
            Route::NotesDelete(slug) => format!("/notes/delete/{slug}"),
            Route::NotesSuccess => NOTES_SUCCESS.to_string(),
            Route::Login => LOGIN.to_string(),
            Route::Logout => LOGOUT.to_string(),
            Route::Signup => SIGNUP.to_string(),
        }
    }
}

/// Where comment create/edit/delete lands: the news page, scrolled to comments.
pub fn comments_of(news_id: i64) -> String {
    format!("{}{COMMENTS_ANCHOR}", Route::NewsDetail(news_id).path())
}

/// login_redirect
///
/// The login URL carrying `next`. `next` is percent-encoded except for `/`,
/// so `/notes/add` stays readable: `/auth/login?next=/notes/add`.
pub fn login_redirect(next: &str) -> String {
    let encoded = urlencoding::encode(next).replace("%2F", "/");
    format!("{LOGIN}?next={encoded}")
}

/// Whether `next` may be used as a post-login redirect target: a local,
/// absolute path that cannot be read as a scheme-relative URL.
pub fn is_safe_next(next: &str) -> bool {
    next.starts_with('/')
        && !next.starts_with("//")
        && !next.starts_with("/\\")
        && next.chars().all(|c| c.is_ascii_graphic())
}
