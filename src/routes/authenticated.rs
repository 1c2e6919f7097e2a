use crate::{
    AppState,
    handlers::{news, notes},
    urls,
};
use axum::{
    Router,
    routing::get,
};

/// Authenticated Router Module
///
/// Every route here sits behind the login-required layer: anonymous requests
/// are redirected to `/auth/login?next=<path>` before reaching a handler.
///
/// Ownership Strategy:
/// Handlers never check "is this yours?" separately. Every lookup and write is
/// scoped by the viewer's id in the repository, so another user's record is
/// answered exactly like a missing one: 404.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // --- News comments (author only) ---
        // GET/POST /news/comments/{id}/edit
        .route(
            urls::NEWS_EDIT_PATTERN,
            get(news::edit_comment_page).post(news::edit_comment),
        )
        // GET /news/comments/{id}/delete shows the confirmation,
        // POST or DELETE performs it.
        .route(
            urls::NEWS_DELETE_PATTERN,
            get(news::delete_comment_page)
                .post(news::delete_comment)
                .delete(news::delete_comment),
        )
        // --- Notes (login only, author only where a slug is involved) ---
        .route(urls::NOTES_LIST, get(notes::list_notes))
        .route(urls::NOTES_ADD, get(notes::add_note_page).post(notes::add_note))
        .route(urls::NOTES_DETAIL_PATTERN, get(notes::note_detail))
        .route(
            urls::NOTES_EDIT_PATTERN,
            get(notes::edit_note_page).post(notes::edit_note),
        )
        .route(
            urls::NOTES_DELETE_PATTERN,
            get(notes::delete_note_page)
                .post(notes::delete_note)
                .delete(notes::delete_note),
        )
        // GET /notes/done
        .route(urls::NOTES_SUCCESS, get(notes::note_success))
}
