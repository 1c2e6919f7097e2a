use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::RepoResult,
    models::{Comment, NewNews, News, Note, NoteDraft, User},
};

mod memory;
mod postgres;

pub use memory::MemoryRepository;
pub use postgres::PostgresRepository;

/// Repository Trait
///
/// The persistence contract shared by the Postgres store and the in-memory
/// store. Every method that touches a note or a comment on behalf of a user
/// takes that user's id and scopes the operation by author, so a record owned
/// by someone else is indistinguishable from a missing one (`None` / `false`).
///
/// Writes that violate a uniqueness rule (username, note slug) fail with
/// `RepoError::Conflict`.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users ---
    async fn create_user(&self, username: &str, password_hash: &str) -> RepoResult<User>;
    async fn get_user(&self, id: Uuid) -> RepoResult<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> RepoResult<Option<User>>;

    // --- News ---
    async fn create_news(&self, news: NewNews) -> RepoResult<News>;
    // Newest first by date, ties by id, at most `limit` rows.
    async fn latest_news(&self, limit: i64) -> RepoResult<Vec<News>>;
    async fn get_news(&self, id: i64) -> RepoResult<Option<News>>;

    // --- Comments ---
    async fn add_comment(&self, news_id: i64, author_id: Uuid, text: &str) -> RepoResult<Comment>;
    // Oldest first by creation time.
    async fn get_comments(&self, news_id: i64) -> RepoResult<Vec<Comment>>;
    // Author-scoped: `None` if missing or not written by `author_id`.
    async fn get_own_comment(&self, id: i64, author_id: Uuid) -> RepoResult<Option<Comment>>;
    async fn update_comment(
        &self,
        id: i64,
        author_id: Uuid,
        text: &str,
    ) -> RepoResult<Option<Comment>>;
    async fn delete_comment(&self, id: i64, author_id: Uuid) -> RepoResult<bool>;

    // --- Notes ---
    async fn create_note(&self, draft: NoteDraft, author_id: Uuid) -> RepoResult<Note>;
    async fn get_notes_by_author(&self, author_id: Uuid) -> RepoResult<Vec<Note>>;
    // Author-scoped: `None` if missing or not written by `author_id`.
    async fn get_own_note(&self, slug: &str, author_id: Uuid) -> RepoResult<Option<Note>>;
    // Whether any note other than `exclude_id` already uses `slug`.
    async fn slug_exists(&self, slug: &str, exclude_id: Option<i64>) -> RepoResult<bool>;
    async fn update_note(
        &self,
        id: i64,
        author_id: Uuid,
        draft: NoteDraft,
    ) -> RepoResult<Option<Note>>;
    async fn delete_note(&self, slug: &str, author_id: Uuid) -> RepoResult<bool>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;
