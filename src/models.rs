use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// An account that can log in and own notes and comments. The password hash
/// never leaves the server: it is skipped by serde and therefore absent from
/// every JSON page and from the generated bindings.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip)]
    pub password_hash: String,
    #[ts(type = "string")]
    pub date_joined: DateTime<Utc>,
}

/// News
///
/// A published news item. Read-only over HTTP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct News {
    pub id: i64,
    pub title: String,
    pub text: String,
    // Publication date; the home page orders by it, newest first.
    #[ts(type = "string")]
    pub date: NaiveDate,
}

/// Comment
///
/// A user comment attached to one news item. `author_username` is filled by a
/// join and is not stored on the row itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Comment {
    pub id: i64,
    pub news_id: i64,
    pub author_id: Uuid,
    pub text: String,
    #[ts(type = "string")]
    pub created: DateTime<Utc>,
    #[sqlx(default)]
    pub author_username: Option<String>,
}

/// Note
///
/// A private note. Visible to and editable by its author only; addressed in
/// URLs by its globally unique slug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub slug: String,
    pub author_id: Uuid,
}

// --- Write Payloads (validated, store-ready) ---

/// NewNews
///
/// Input for publishing a news item. A missing date means "today".
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct NewNews {
    pub title: String,
    pub text: String,
    pub date: Option<NaiveDate>,
}

/// NoteDraft
///
/// A note form that passed validation: the slug is final (explicit or derived
/// from the title) and only its uniqueness remains to be enforced by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct NoteDraft {
    pub title: String,
    pub text: String,
    pub slug: String,
}
