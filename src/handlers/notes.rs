use axum::{
    Form,
    extract::{Path, State},
    response::Response,
};

use super::{found, render};
use crate::{
    AppState,
    auth::{AuthUser, CurrentUser},
    error::{AppError, RepoError},
    forms::{self, BoundForm, FormErrors, NoteForm},
    models::NoteDraft,
    pages::{MessagePage, NoteDeletePage, NoteDetailPage, NoteFormPage, NoteListPage, NotesHomePage},
    urls::Route,
};

/// notes_home
///
/// [Public Route] Landing page of the notes app.
#[utoipa::path(
    get,
    path = "/notes",
    responses((status = 200, description = "Landing page", body = NotesHomePage))
)]
pub async fn notes_home(CurrentUser(user): CurrentUser) -> Response {
    render(NotesHomePage {
        username: user.map(|u| u.username),
    })
}

/// list_notes
///
/// [Authenticated Route] The viewer's own notes. Other users' notes never appear.
#[utoipa::path(
    get,
    path = "/notes/list",
    responses((status = 200, description = "My notes", body = NoteListPage))
)]
pub async fn list_notes(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let object_list = state.repo.get_notes_by_author(user.id).await?;
    Ok(render(NoteListPage { object_list }))
}

/// note_detail
///
/// [Authenticated Route] One of the viewer's own notes, by slug.
#[utoipa::path(
    get,
    path = "/notes/note/{slug}",
    params(("slug" = String, Path, description = "Note slug")),
    responses(
        (status = 200, description = "Note", body = NoteDetailPage),
        (status = 404, description = "Missing or not yours")
    )
)]
pub async fn note_detail(
    user: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let note = state
        .repo
        .get_own_note(&slug, user.id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(render(NoteDetailPage { note }))
}

/// add_note_page
///
/// [Authenticated Route] Empty note form.
#[utoipa::path(
    get,
    path = "/notes/add",
    responses((status = 200, description = "Empty form"))
)]
pub async fn add_note_page(_user: AuthUser) -> Response {
    render(NoteFormPage {
        form: BoundForm::unbound(NoteForm::default()),
    })
}

/// add_note
///
/// [Authenticated Route] Creates a note owned by the viewer. An empty slug is
/// derived from the title; a slug used by any other note is rejected on the
/// `slug` field and nothing is created.
#[utoipa::path(
    post,
    path = "/notes/add",
    request_body(content = NoteForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Created, redirect to the success page"),
        (status = 200, description = "Validation failed, form re-rendered")
    )
)]
pub async fn add_note(
    user: AuthUser,
    State(state): State<AppState>,
    Form(form): Form<NoteForm>,
) -> Result<Response, AppError> {
    let draft = match validate(&state, &form, None).await? {
        Ok(draft) => draft,
        Err(errors) => return Ok(rerender(form, errors)),
    };

    let slug = draft.slug.clone();
    match state.repo.create_note(draft, user.id).await {
        Ok(note) => {
            tracing::info!(note_id = note.id, slug = %note.slug, author = %user.id, "note created");
            Ok(found(Route::NotesSuccess.path()))
        }
        Err(RepoError::Conflict(_)) => Ok(rerender(form, forms::slug_taken_error(&slug))),
        Err(err) => Err(err.into()),
    }
}

/// edit_note_page
///
/// [Authenticated Route] Edit form pre-filled with one of the viewer's notes.
#[utoipa::path(
    get,
    path = "/notes/edit/{slug}",
    params(("slug" = String, Path, description = "Note slug")),
    responses(
        (status = 200, description = "Pre-filled form"),
        (status = 404, description = "Missing or not yours")
    )
)]
pub async fn edit_note_page(
    user: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let note = state
        .repo
        .get_own_note(&slug, user.id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(render(NoteFormPage {
        form: BoundForm::unbound(NoteForm::from_note(&note)),
    }))
}

/// edit_note
///
/// [Authenticated Route] Updates one of the viewer's notes. The note may keep
/// its own slug; taking another note's slug is rejected like on creation.
#[utoipa::path(
    post,
    path = "/notes/edit/{slug}",
    params(("slug" = String, Path, description = "Note slug")),
    request_body(content = NoteForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Updated, redirect to the success page"),
        (status = 200, description = "Validation failed, form re-rendered"),
        (status = 404, description = "Missing or not yours")
    )
)]
pub async fn edit_note(
    user: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Form(form): Form<NoteForm>,
) -> Result<Response, AppError> {
    let note = state
        .repo
        .get_own_note(&slug, user.id)
        .await?
        .ok_or(AppError::NotFound)?;
    let draft = match validate(&state, &form, Some(note.id)).await? {
        Ok(draft) => draft,
        Err(errors) => return Ok(rerender(form, errors)),
    };

    let new_slug = draft.slug.clone();
    match state.repo.update_note(note.id, user.id, draft).await {
        Ok(Some(updated)) => {
            tracing::info!(note_id = updated.id, slug = %updated.slug, author = %user.id, "note updated");
            Ok(found(Route::NotesSuccess.path()))
        }
        Ok(None) => Err(AppError::NotFound),
        Err(RepoError::Conflict(_)) => Ok(rerender(form, forms::slug_taken_error(&new_slug))),
        Err(err) => Err(err.into()),
    }
}

/// delete_note_page
///
/// [Authenticated Route] Confirmation page for deleting one of the viewer's notes.
#[utoipa::path(
    get,
    path = "/notes/delete/{slug}",
    params(("slug" = String, Path, description = "Note slug")),
    responses(
        (status = 200, description = "Confirmation", body = NoteDeletePage),
        (status = 404, description = "Missing or not yours")
    )
)]
pub async fn delete_note_page(
    user: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let note = state
        .repo
        .get_own_note(&slug, user.id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(render(NoteDeletePage { note }))
}

/// delete_note
///
/// [Authenticated Route] Deletes one of the viewer's notes. Accepts both
/// `POST` (HTML forms) and `DELETE`.
#[utoipa::path(
    delete,
    path = "/notes/delete/{slug}",
    params(("slug" = String, Path, description = "Note slug")),
    responses(
        (status = 302, description = "Deleted, redirect to the success page"),
        (status = 404, description = "Missing or not yours")
    )
)]
pub async fn delete_note(
    user: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    if !state.repo.delete_note(&slug, user.id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(slug = %slug, author = %user.id, "note deleted");
    Ok(found(Route::NotesSuccess.path()))
}

/// note_success
///
/// [Authenticated Route] Shown after a note was added, edited or deleted.
#[utoipa::path(
    get,
    path = "/notes/done",
    responses((status = 200, description = "Success page", body = MessagePage))
)]
pub async fn note_success(_user: AuthUser) -> Response {
    render(MessagePage {
        message: "Успешно!".to_string(),
    })
}

/// Field checks plus the slug uniqueness lookup. The outer `Result` carries
/// store failures, the inner one form errors.
async fn validate(
    state: &AppState,
    form: &NoteForm,
    exclude_id: Option<i64>,
) -> Result<Result<NoteDraft, FormErrors>, AppError> {
    let draft = match form.clean() {
        Ok(draft) => draft,
        Err(errors) => return Ok(Err(errors)),
    };
    if state.repo.slug_exists(&draft.slug, exclude_id).await? {
        return Ok(Err(forms::slug_taken_error(&draft.slug)));
    }
    Ok(Ok(draft))
}

fn rerender(form: NoteForm, errors: FormErrors) -> Response {
    render(NoteFormPage {
        form: BoundForm::with_errors(form, errors),
    })
}
