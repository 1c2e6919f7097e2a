use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::Repository;
use crate::{
    error::RepoResult,
    models::{Comment, NewNews, News, Note, NoteDraft, User},
};

const COMMENT_COLUMNS: &str = r#"
    c.id, c.news_id, c.author_id, c.text, c.created, u.username AS author_username
"#;

/// PostgresRepository
///
/// The production implementation of `Repository`, backed by a Postgres pool.
/// Ownership is enforced in SQL: every author-scoped statement carries
/// `AND author_id = $n`, so a foreign row simply matches nothing.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded migrations under `migrations/`.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!().run(&self.pool).await
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    // --- USERS ---

    async fn create_user(&self, username: &str, password_hash: &str) -> RepoResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, password_hash, date_joined)
            VALUES ($1, $2, $3, NOW())
            RETURNING id, username, password_hash, date_joined
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, date_joined FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn get_user_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, date_joined FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    // --- NEWS ---

    async fn create_news(&self, news: NewNews) -> RepoResult<News> {
        let date = news.date.unwrap_or_else(|| Utc::now().date_naive());
        let news = sqlx::query_as::<_, News>(
            "INSERT INTO news (title, text, date) VALUES ($1, $2, $3) RETURNING id, title, text, date",
        )
        .bind(news.title)
        .bind(news.text)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;
        Ok(news)
    }

    async fn latest_news(&self, limit: i64) -> RepoResult<Vec<News>> {
        let news = sqlx::query_as::<_, News>(
            "SELECT id, title, text, date FROM news ORDER BY date DESC, id DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(news)
    }

    async fn get_news(&self, id: i64) -> RepoResult<Option<News>> {
        let news = sqlx::query_as::<_, News>("SELECT id, title, text, date FROM news WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(news)
    }

    // --- COMMENTS ---

    /// add_comment
    ///
    /// Inserts and joins the author's username in one round trip (CTE).
    async fn add_comment(&self, news_id: i64, author_id: Uuid, text: &str) -> RepoResult<Comment> {
        let query = format!(
            r#"
            WITH c AS (
                INSERT INTO comments (news_id, author_id, text, created)
                VALUES ($1, $2, $3, clock_timestamp())
                RETURNING id, news_id, author_id, text, created
            )
            SELECT {COMMENT_COLUMNS} FROM c JOIN users u ON c.author_id = u.id
            "#
        );
        let comment = sqlx::query_as::<_, Comment>(&query)
            .bind(news_id)
            .bind(author_id)
            .bind(text)
            .fetch_one(&self.pool)
            .await?;
        Ok(comment)
    }

    async fn get_comments(&self, news_id: i64) -> RepoResult<Vec<Comment>> {
        let query = format!(
            r#"
            SELECT {COMMENT_COLUMNS}
            FROM comments c JOIN users u ON c.author_id = u.id
            WHERE c.news_id = $1
            ORDER BY c.created ASC, c.id ASC
            "#
        );
        let comments = sqlx::query_as::<_, Comment>(&query)
            .bind(news_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(comments)
    }

    async fn get_own_comment(&self, id: i64, author_id: Uuid) -> RepoResult<Option<Comment>> {
        let query = format!(
            r#"
            SELECT {COMMENT_COLUMNS}
            FROM comments c JOIN users u ON c.author_id = u.id
            WHERE c.id = $1 AND c.author_id = $2
            "#
        );
        let comment = sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(author_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(comment)
    }

    async fn update_comment(
        &self,
        id: i64,
        author_id: Uuid,
        text: &str,
    ) -> RepoResult<Option<Comment>> {
        let query = format!(
            r#"
            WITH c AS (
                UPDATE comments SET text = $3
                WHERE id = $1 AND author_id = $2
                RETURNING id, news_id, author_id, text, created
            )
            SELECT {COMMENT_COLUMNS} FROM c JOIN users u ON c.author_id = u.id
            "#
        );
        let comment = sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(author_id)
            .bind(text)
            .fetch_optional(&self.pool)
            .await?;
        Ok(comment)
    }

    async fn delete_comment(&self, id: i64, author_id: Uuid) -> RepoResult<bool> {
        let res = sqlx::query("DELETE FROM comments WHERE id = $1 AND author_id = $2")
            .bind(id)
            .bind(author_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    // --- NOTES ---

    async fn create_note(&self, draft: NoteDraft, author_id: Uuid) -> RepoResult<Note> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (title, text, slug, author_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, text, slug, author_id
            "#,
        )
        .bind(draft.title)
        .bind(draft.text)
        .bind(draft.slug)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(note)
    }

    async fn get_notes_by_author(&self, author_id: Uuid) -> RepoResult<Vec<Note>> {
        let notes = sqlx::query_as::<_, Note>(
            "SELECT id, title, text, slug, author_id FROM notes WHERE author_id = $1 ORDER BY id",
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(notes)
    }

    async fn get_own_note(&self, slug: &str, author_id: Uuid) -> RepoResult<Option<Note>> {
        let note = sqlx::query_as::<_, Note>(
            "SELECT id, title, text, slug, author_id FROM notes WHERE slug = $1 AND author_id = $2",
        )
        .bind(slug)
        .bind(author_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(note)
    }

    async fn slug_exists(&self, slug: &str, exclude_id: Option<i64>) -> RepoResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM notes WHERE slug = $1 AND ($2::BIGINT IS NULL OR id <> $2))",
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn update_note(
        &self,
        id: i64,
        author_id: Uuid,
        draft: NoteDraft,
    ) -> RepoResult<Option<Note>> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            UPDATE notes SET title = $3, text = $4, slug = $5
            WHERE id = $1 AND author_id = $2
            RETURNING id, title, text, slug, author_id
            "#,
        )
        .bind(id)
        .bind(author_id)
        .bind(draft.title)
        .bind(draft.text)
        .bind(draft.slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(note)
    }

    async fn delete_note(&self, slug: &str, author_id: Uuid) -> RepoResult<bool> {
        let res = sqlx::query("DELETE FROM notes WHERE slug = $1 AND author_id = $2")
            .bind(slug)
            .bind(author_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
