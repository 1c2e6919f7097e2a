use axum::{
    Form,
    extract::State,
    response::Response,
};

use super::{PathId, found, render};
use crate::{
    AppState,
    auth::{AuthUser, CurrentUser},
    error::AppError,
    forms::{BoundForm, CommentForm},
    pages::{CommentDeletePage, CommentEditPage, NewsDetailPage, NewsHomePage},
    urls,
};

/// news_home
///
/// [Public Route] The most recent news, newest first, capped at
/// `news_count_on_home_page`.
#[utoipa::path(
    get,
    path = "/news",
    responses((status = 200, description = "Latest news", body = NewsHomePage))
)]
pub async fn news_home(State(state): State<AppState>) -> Result<Response, AppError> {
    let limit = i64::try_from(state.config.news_count_on_home_page).unwrap_or(i64::MAX);
    let object_list = state.repo.latest_news(limit).await?;
    Ok(render(NewsHomePage { object_list }))
}

/// news_detail
///
/// [Public Route] One news item with its comments, oldest first. The comment
/// form is included only when the viewer is logged in.
#[utoipa::path(
    get,
    path = "/news/{id}",
    params(("id" = i64, Path, description = "News ID")),
    responses(
        (status = 200, description = "News with comments"),
        (status = 404, description = "No such news")
    )
)]
pub async fn news_detail(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Response, AppError> {
    let form = user.map(|_| BoundForm::unbound(CommentForm::default()));
    detail_page(&state, id, form).await
}

async fn detail_page(
    state: &AppState,
    news_id: i64,
    form: Option<BoundForm<CommentForm>>,
) -> Result<Response, AppError> {
    let news = state.repo.get_news(news_id).await?.ok_or(AppError::NotFound)?;
    let comments = state.repo.get_comments(news_id).await?;
    Ok(render(NewsDetailPage {
        news,
        comments,
        form,
    }))
}

/// create_comment
///
/// [Authenticated Route] Posts a comment on a news item. Anonymous submissions
/// are redirected to login and nothing is stored. A comment with a forbidden
/// word re-renders the detail page with the error on `text`.
#[utoipa::path(
    post,
    path = "/news/{id}",
    params(("id" = i64, Path, description = "News ID")),
    request_body(content = CommentForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Created, redirect to the comments anchor"),
        (status = 200, description = "Validation failed, form re-rendered"),
        (status = 404, description = "No such news")
    )
)]
pub async fn create_comment(
    user: AuthUser,
    State(state): State<AppState>,
    PathId(news_id): PathId,
    Form(form): Form<CommentForm>,
) -> Result<Response, AppError> {
    if state.repo.get_news(news_id).await?.is_none() {
        return Err(AppError::NotFound);
    }
    let text = match form.clean() {
        Ok(text) => text,
        Err(errors) => {
            return detail_page(&state, news_id, Some(BoundForm::with_errors(form, errors))).await;
        }
    };

    let comment = state.repo.add_comment(news_id, user.id, &text).await?;
    tracing::info!(comment_id = comment.id, news_id, author = %user.id, "comment created");
    Ok(found(urls::comments_of(news_id)))
}

/// edit_comment_page
///
/// [Authenticated Route] The edit form of one of the viewer's own comments.
#[utoipa::path(
    get,
    path = "/news/comments/{id}/edit",
    params(("id" = i64, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Edit form"),
        (status = 404, description = "Missing or not yours")
    )
)]
pub async fn edit_comment_page(
    user: AuthUser,
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Response, AppError> {
    let comment = state
        .repo
        .get_own_comment(id, user.id)
        .await?
        .ok_or(AppError::NotFound)?;
    let form = BoundForm::unbound(CommentForm {
        text: comment.text.clone(),
    });
    Ok(render(CommentEditPage { comment, form }))
}

/// edit_comment
///
/// [Authenticated Route] Replaces the text of one of the viewer's own
/// comments. Someone else's comment answers 404 and stays untouched.
#[utoipa::path(
    post,
    path = "/news/comments/{id}/edit",
    params(("id" = i64, Path, description = "Comment ID")),
    request_body(content = CommentForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Updated, redirect to the comments anchor"),
        (status = 200, description = "Validation failed, form re-rendered"),
        (status = 404, description = "Missing or not yours")
    )
)]
pub async fn edit_comment(
    user: AuthUser,
    State(state): State<AppState>,
    PathId(id): PathId,
    Form(form): Form<CommentForm>,
) -> Result<Response, AppError> {
    let comment = state
        .repo
        .get_own_comment(id, user.id)
        .await?
        .ok_or(AppError::NotFound)?;
    let text = match form.clean() {
        Ok(text) => text,
        Err(errors) => {
            let form = BoundForm::with_errors(form, errors);
            return Ok(render(CommentEditPage { comment, form }));
        }
    };

    let updated = state
        .repo
        .update_comment(id, user.id, &text)
        .await?
        .ok_or(AppError::NotFound)?;
    tracing::info!(comment_id = id, author = %user.id, "comment updated");
    Ok(found(urls::comments_of(updated.news_id)))
}

/// delete_comment_page
///
/// [Authenticated Route] Confirmation page for deleting one of the viewer's
/// own comments.
#[utoipa::path(
    get,
    path = "/news/comments/{id}/delete",
    params(("id" = i64, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Confirmation", body = CommentDeletePage),
        (status = 404, description = "Missing or not yours")
    )
)]
pub async fn delete_comment_page(
    user: AuthUser,
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Response, AppError> {
    let comment = state
        .repo
        .get_own_comment(id, user.id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(render(CommentDeletePage { comment }))
}

/// delete_comment
///
/// [Authenticated Route] Deletes one of the viewer's own comments. Accepts
/// both `POST` (HTML forms) and `DELETE`.
#[utoipa::path(
    post,
    path = "/news/comments/{id}/delete",
    params(("id" = i64, Path, description = "Comment ID")),
    responses(
        (status = 302, description = "Deleted, redirect to the comments anchor"),
        (status = 404, description = "Missing or not yours")
    )
)]
pub async fn delete_comment(
    user: AuthUser,
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Response, AppError> {
    let comment = state
        .repo
        .get_own_comment(id, user.id)
        .await?
        .ok_or(AppError::NotFound)?;
    if !state.repo.delete_comment(id, user.id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(comment_id = id, author = %user.id, "comment deleted");
    Ok(found(urls::comments_of(comment.news_id)))
}
