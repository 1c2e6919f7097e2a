#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, Bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use tower::ServiceExt;
use ya_portal::{
    AppConfig, AppState, MemoryRepository, create_router,
    auth,
    models::{Comment, NewNews, News, Note, NoteDraft, User},
    repository::{Repository, RepositoryState},
};

// --- In-process application ---

/// The full router over a fresh in-memory store. Requests go through
/// `oneshot`, so every layer (login gate, tracing, request id) is exercised.
pub struct TestApp {
    pub repo: Arc<MemoryRepository>,
    pub config: AppConfig,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let repo = Arc::new(MemoryRepository::new());
        let state = AppState {
            repo: repo.clone() as RepositoryState,
            config: config.clone(),
        };
        Self {
            repo,
            config,
            router: create_router(state),
        }
    }

    // --- Fixtures ---

    /// A user who never logs in with a password; tests authenticate it with a token.
    pub async fn user(&self, username: &str) -> User {
        self.repo
            .create_user(username, "!unusable")
            .await
            .expect("create user")
    }

    pub fn token(&self, user: &User) -> String {
        auth::issue_token(&self.config, user.id).expect("issue token")
    }

    pub async fn news(&self, title: &str, date: NaiveDate) -> News {
        self.repo
            .create_news(NewNews {
                title: title.to_string(),
                text: "Просто текст.".to_string(),
                date: Some(date),
            })
            .await
            .expect("create news")
    }

    pub async fn comment(&self, news: &News, author: &User, text: &str) -> Comment {
        self.repo
            .add_comment(news.id, author.id, text)
            .await
            .expect("add comment")
    }

    pub async fn note(&self, author: &User, title: &str, slug: &str) -> Note {
        self.repo
            .create_note(
                NoteDraft {
                    title: title.to_string(),
                    text: "Текст заметки".to_string(),
                    slug: slug.to_string(),
                },
                author.id,
            )
            .await
            .expect("create note")
    }

    // --- Requests ---

    pub async fn get(&self, path: &str, user: Option<&User>) -> TestResponse {
        self.send(self.request(Method::GET, path, user).body(Body::empty()).unwrap())
            .await
    }

    pub async fn delete(&self, path: &str, user: Option<&User>) -> TestResponse {
        self.send(self.request(Method::DELETE, path, user).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_form(
        &self,
        path: &str,
        fields: &[(&str, &str)],
        user: Option<&User>,
    ) -> TestResponse {
        let request = self
            .request(Method::POST, path, user)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(encode_form(fields)))
            .unwrap();
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        TestResponse {
            status,
            headers,
            body,
        }
    }

    fn request(&self, method: Method, path: &str, user: Option<&User>) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(path);
        match user {
            Some(user) => builder.header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.token(user)),
            ),
            None => builder,
        }
    }
}

pub fn encode_form(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

// --- Responses ---

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json<T: DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).unwrap_or_else(|err| {
            panic!(
                "body is not the expected page ({err}): {}",
                String::from_utf8_lossy(&self.body)
            )
        })
    }

    pub fn location(&self) -> &str {
        self.headers
            .get(header::LOCATION)
            .expect("response has no Location header")
            .to_str()
            .unwrap()
    }

    pub fn assert_redirect(&self, location: &str) {
        assert_eq!(self.status, StatusCode::FOUND, "expected a redirect");
        assert_eq!(self.location(), location);
    }

    pub fn assert_login_redirect(&self, next: &str) {
        self.assert_redirect(&format!("/auth/login?next={next}"));
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
