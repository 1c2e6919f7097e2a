use crate::{
    AppState,
    handlers::{news, notes, users},
    urls,
};
use axum::{
    Router,
    routing::get,
};

/// Public Router Module
///
/// Pages every visitor can open: both home pages, the news detail page and
/// the account pages. Posting a comment shares the news detail path; its
/// handler takes `AuthUser`, so anonymous submissions are redirected to login.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness check for load balancers.
        .route("/health", get(|| async { "ok" }))
        // GET /news
        // Latest news, newest first, capped by configuration.
        .route(urls::NEWS_HOME, get(news::news_home))
        // GET/POST /news/{id}
        // News with comments; POST adds a comment (login required).
        .route(
            urls::NEWS_DETAIL_PATTERN,
            get(news::news_detail).post(news::create_comment),
        )
        // GET /notes
        .route(urls::NOTES_HOME, get(notes::notes_home))
        // --- Accounts ---
        .route(urls::LOGIN, get(users::login_page).post(users::login))
        .route(urls::LOGOUT, get(users::logout).post(users::logout))
        .route(urls::SIGNUP, get(users::signup_page).post(users::signup))
}
