use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::Repository;
use crate::{
    clock::MonotonicClock,
    error::{RepoError, RepoResult},
    models::{Comment, NewNews, News, Note, NoteDraft, User},
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    news: Vec<News>,
    comments: Vec<Comment>,
    notes: Vec<Note>,
    last_news_id: i64,
    last_comment_id: i64,
    last_note_id: i64,
}

impl Tables {
    fn username_of(&self, id: Uuid) -> Option<String> {
        self.users.iter().find(|u| u.id == id).map(|u| u.username.clone())
    }

    fn with_author(&self, comment: &Comment) -> Comment {
        Comment {
            author_username: self.username_of(comment.author_id),
            ..comment.clone()
        }
    }

    fn slug_taken(&self, slug: &str, exclude_id: Option<i64>) -> bool {
        self.notes
            .iter()
            .any(|n| n.slug == slug && Some(n.id) != exclude_id)
    }
}

/// MemoryRepository
///
/// A `Repository` kept entirely in process memory. Used by the test suite and
/// by local runs without `DATABASE_URL`. Mirrors the Postgres constraints:
/// unique usernames, unique slugs and author-scoped reads and writes.
#[derive(Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
    clock: MonotonicClock,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored comments across all news.
    pub async fn comment_count(&self) -> usize {
        self.tables.read().await.comments.len()
    }

    /// Number of stored notes across all authors.
    pub async fn note_count(&self) -> usize {
        self.tables.read().await.notes.len()
    }

    /// Looks a comment up without any ownership scoping.
    pub async fn find_comment(&self, id: i64) -> Option<Comment> {
        let tables = self.tables.read().await;
        tables
            .comments
            .iter()
            .find(|c| c.id == id)
            .map(|c| tables.with_author(c))
    }

    /// Overrides the creation time of a comment. Returns `false` when no
    /// comment has that id.
    pub async fn set_comment_created(&self, id: i64, created: DateTime<Utc>) -> bool {
        let mut tables = self.tables.write().await;
        match tables.comments.iter_mut().find(|c| c.id == id) {
            Some(comment) => {
                comment.created = created;
                true
            }
            None => false,
        }
    }

    /// Looks a note up by id without any ownership scoping.
    pub async fn find_note(&self, id: i64) -> Option<Note> {
        self.tables.read().await.notes.iter().find(|n| n.id == id).cloned()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn create_user(&self, username: &str, password_hash: &str) -> RepoResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.username == username) {
            return Err(RepoError::Conflict("users_username_key".to_string()));
        }
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            date_joined: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> RepoResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn create_news(&self, news: NewNews) -> RepoResult<News> {
        let mut tables = self.tables.write().await;
        tables.last_news_id += 1;
        let news = News {
            id: tables.last_news_id,
            title: news.title,
            text: news.text,
            date: news.date.unwrap_or_else(|| Utc::now().date_naive()),
        };
        tables.news.push(news.clone());
        Ok(news)
    }

    async fn latest_news(&self, limit: i64) -> RepoResult<Vec<News>> {
        let tables = self.tables.read().await;
        let mut news = tables.news.clone();
        news.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        news.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(news)
    }

    async fn get_news(&self, id: i64) -> RepoResult<Option<News>> {
        let tables = self.tables.read().await;
        Ok(tables.news.iter().find(|n| n.id == id).cloned())
    }

    async fn add_comment(&self, news_id: i64, author_id: Uuid, text: &str) -> RepoResult<Comment> {
        let mut tables = self.tables.write().await;
        tables.last_comment_id += 1;
        let comment = Comment {
            id: tables.last_comment_id,
            news_id,
            author_id,
            text: text.to_string(),
            created: self.clock.now(),
            author_username: None,
        };
        tables.comments.push(comment.clone());
        Ok(tables.with_author(&comment))
    }

    async fn get_comments(&self, news_id: i64) -> RepoResult<Vec<Comment>> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .iter()
            .filter(|c| c.news_id == news_id)
            .map(|c| tables.with_author(c))
            .collect();
        comments.sort_by(|a, b| a.created.cmp(&b.created).then(a.id.cmp(&b.id)));
        Ok(comments)
    }

    async fn get_own_comment(&self, id: i64, author_id: Uuid) -> RepoResult<Option<Comment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .iter()
            .find(|c| c.id == id && c.author_id == author_id)
            .map(|c| tables.with_author(c)))
    }

    async fn update_comment(
        &self,
        id: i64,
        author_id: Uuid,
        text: &str,
    ) -> RepoResult<Option<Comment>> {
        let mut tables = self.tables.write().await;
        let Some(comment) = tables
            .comments
            .iter_mut()
            .find(|c| c.id == id && c.author_id == author_id)
        else {
            return Ok(None);
        };
        comment.text = text.to_string();
        let updated = comment.clone();
        Ok(Some(tables.with_author(&updated)))
    }

    async fn delete_comment(&self, id: i64, author_id: Uuid) -> RepoResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.comments.len();
        tables
            .comments
            .retain(|c| !(c.id == id && c.author_id == author_id));
        Ok(tables.comments.len() < before)
    }

    async fn create_note(&self, draft: NoteDraft, author_id: Uuid) -> RepoResult<Note> {
        let mut tables = self.tables.write().await;
        if tables.slug_taken(&draft.slug, None) {
            return Err(RepoError::Conflict("notes_slug_key".to_string()));
        }
        tables.last_note_id += 1;
        let note = Note {
            id: tables.last_note_id,
            title: draft.title,
            text: draft.text,
            slug: draft.slug,
            author_id,
        };
        tables.notes.push(note.clone());
        Ok(note)
    }

    async fn get_notes_by_author(&self, author_id: Uuid) -> RepoResult<Vec<Note>> {
        let tables = self.tables.read().await;
        Ok(tables
            .notes
            .iter()
            .filter(|n| n.author_id == author_id)
            .cloned()
            .collect())
    }

    async fn get_own_note(&self, slug: &str, author_id: Uuid) -> RepoResult<Option<Note>> {
        let tables = self.tables.read().await;
        Ok(tables
            .notes
            .iter()
            .find(|n| n.slug == slug && n.author_id == author_id)
            .cloned())
    }

    async fn slug_exists(&self, slug: &str, exclude_id: Option<i64>) -> RepoResult<bool> {
        Ok(self.tables.read().await.slug_taken(slug, exclude_id))
    }

    async fn update_note(
        &self,
        id: i64,
        author_id: Uuid,
        draft: NoteDraft,
    ) -> RepoResult<Option<Note>> {
        let mut tables = self.tables.write().await;
        if !tables
            .notes
            .iter()
            .any(|n| n.id == id && n.author_id == author_id)
        {
            return Ok(None);
        }
        if tables.slug_taken(&draft.slug, Some(id)) {
            return Err(RepoError::Conflict("notes_slug_key".to_string()));
        }
        let Some(note) = tables.notes.iter_mut().find(|n| n.id == id) else {
            return Ok(None);
        };
        note.title = draft.title;
        note.text = draft.text;
        note.slug = draft.slug;
        Ok(Some(note.clone()))
    }

    async fn delete_note(&self, slug: &str, author_id: Uuid) -> RepoResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.notes.len();
        tables
            .notes
            .retain(|n| !(n.slug == slug && n.author_id == author_id));
        Ok(tables.notes.len() < before)
    }
}
