//! JSON pages.
//!
//! Each page is the context a template would receive: the objects shown and,
//! where the viewer may submit something, the bound form.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    forms::{BoundForm, CommentForm, LoginForm, NoteForm, SignupForm},
    models::{Comment, News, Note},
};

// --- News ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewsHomePage {
    pub object_list: Vec<News>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsDetailPage {
    pub news: News,
    pub comments: Vec<Comment>,
    // Present only for authenticated viewers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<BoundForm<CommentForm>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentEditPage {
    pub comment: Comment,
    pub form: BoundForm<CommentForm>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentDeletePage {
    pub comment: Comment,
}

// --- Notes ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NotesHomePage {
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NoteListPage {
    pub object_list: Vec<Note>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NoteDetailPage {
    pub note: Note,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteFormPage {
    pub form: BoundForm<NoteForm>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NoteDeletePage {
    pub note: Note,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessagePage {
    pub message: String,
}

// --- Users ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginPage {
    pub form: BoundForm<LoginForm>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupPage {
    pub form: BoundForm<SignupForm>,
}
