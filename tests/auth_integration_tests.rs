mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::Utc;
use common::TestApp;
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;
use ya_portal::{
    AppConfig,
    auth::{self, Claims},
    config::Env,
    forms::{self, NON_FIELD_ERRORS},
    pages::{LoginPage, MessagePage, NotesHomePage, SignupPage},
    repository::Repository,
    urls::{self, Route},
};

// --- Helpers ---

/// Username shown on the notes home page for a request, `None` when anonymous.
async fn viewer(app: &TestApp, request: Request<Body>) -> Option<String> {
    let response = app.send(request).await;
    assert_eq!(response.status, StatusCode::OK);
    response.json::<NotesHomePage>().username
}

fn home_request() -> axum::http::request::Builder {
    Request::builder().uri(urls::NOTES_HOME)
}

fn sign(claims: &Claims, secret: &str) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

/// The `jwt=<token>` pair out of a `Set-Cookie` header.
fn session_pair(set_cookie: &str) -> &str {
    set_cookie.split(';').next().unwrap()
}

// --- Token resolution ---

#[tokio::test]
async fn test_bearer_token_authenticates() {
    let app = TestApp::new();
    let user = app.user("Автор").await;

    let request = home_request()
        .header(header::AUTHORIZATION, format!("Bearer {}", app.token(&user)))
        .body(Body::empty())
        .unwrap();

    assert_eq!(viewer(&app, request).await.as_deref(), Some("Автор"));
}

#[tokio::test]
async fn test_session_cookie_authenticates() {
    let app = TestApp::new();
    let user = app.user("Автор").await;

    let request = home_request()
        .header(header::COOKIE, format!("theme=dark; jwt={}", app.token(&user)))
        .body(Body::empty())
        .unwrap();

    assert_eq!(viewer(&app, request).await.as_deref(), Some("Автор"));
}

#[tokio::test]
async fn test_expired_token_is_anonymous() {
    let app = TestApp::new();
    let user = app.user("Автор").await;
    let now = Utc::now().timestamp() as usize;
    let token = sign(
        &Claims {
            sub: user.id,
            iat: now - 7200,
            exp: now - 3600,
        },
        &app.config.jwt_secret,
    );

    let request = home_request()
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();

    assert_eq!(viewer(&app, request).await, None);
}

#[tokio::test]
async fn test_token_with_foreign_signature_is_anonymous() {
    let app = TestApp::new();
    let user = app.user("Автор").await;
    let now = Utc::now().timestamp() as usize;
    let token = sign(
        &Claims {
            sub: user.id,
            iat: now,
            exp: now + 3600,
        },
        "some-other-secret",
    );

    let request = home_request()
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();

    assert_eq!(viewer(&app, request).await, None);
}

#[tokio::test]
async fn test_token_of_unknown_user_is_anonymous() {
    let app = TestApp::new();
    let token = auth::issue_token(&app.config, Uuid::new_v4()).unwrap();

    let request = Request::builder()
        .uri(urls::NOTES_LIST)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();

    app.send(request).await.assert_login_redirect(urls::NOTES_LIST);
}

#[tokio::test]
async fn test_user_id_header_accepted_locally() {
    let app = TestApp::new();
    let user = app.user("Автор").await;

    let request = home_request()
        .header("x-user-id", user.id.to_string())
        .body(Body::empty())
        .unwrap();

    assert_eq!(viewer(&app, request).await.as_deref(), Some("Автор"));
}

#[tokio::test]
async fn test_user_id_header_ignored_in_production() {
    let app = TestApp::with_config(AppConfig {
        env: Env::Production,
        ..AppConfig::default()
    });
    let user = app.user("Автор").await;

    let request = home_request()
        .header("x-user-id", user.id.to_string())
        .body(Body::empty())
        .unwrap();

    assert_eq!(viewer(&app, request).await, None);
}

#[tokio::test]
async fn test_login_redirect_keeps_query() {
    let app = TestApp::new();

    let response = app.get("/notes/list?page=2", None).await;

    response.assert_redirect("/auth/login?next=/notes/list%3Fpage%3D2");
}

// --- Account pages ---

#[tokio::test]
async fn test_account_pages_available_for_anonymous_user() {
    let app = TestApp::new();

    for path in [Route::Login.path(), Route::Logout.path(), Route::Signup.path()] {
        let response = app.get(&path, None).await;
        assert_eq!(response.status, StatusCode::OK, "{path}");
    }
}

#[tokio::test]
async fn test_login_page_remembers_next() {
    let app = TestApp::new();

    let page: LoginPage = app.get("/auth/login?next=/notes/add", None).await.json();
    assert_eq!(page.form.data.next.as_deref(), Some("/notes/add"));
}

#[tokio::test]
async fn test_signup_then_login() {
    let app = TestApp::new();

    let response = app
        .post_form(
            urls::SIGNUP,
            &[
                ("username", "new_user"),
                ("password1", "Sup3r-Secret"),
                ("password2", "Sup3r-Secret"),
            ],
            None,
        )
        .await;
    response.assert_redirect(urls::LOGIN);

    let stored = app
        .repo
        .get_user_by_username("new_user")
        .await
        .unwrap()
        .expect("user registered");
    assert_ne!(stored.password_hash, "Sup3r-Secret");

    let response = app
        .post_form(
            urls::LOGIN,
            &[
                ("username", "new_user"),
                ("password", "Sup3r-Secret"),
                ("next", "/notes/add"),
            ],
            None,
        )
        .await;
    response.assert_redirect("/notes/add");

    let set_cookie = response.headers[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.starts_with("jwt="));
    assert!(set_cookie.contains("HttpOnly"));

    // The issued cookie opens login-only pages.
    let request = Request::builder()
        .uri(urls::NOTES_ADD)
        .header(header::COOKIE, session_pair(set_cookie))
        .body(Body::empty())
        .unwrap();
    assert_eq!(app.send(request).await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_ignores_unsafe_next() {
    let app = TestApp::new();
    let hash = auth::hash_password("Sup3r-Secret").unwrap();
    app.repo.create_user("reader", &hash).await.unwrap();

    for next in ["//evil.example", "https://evil.example/", ""] {
        let response = app
            .post_form(
                urls::LOGIN,
                &[("username", "reader"), ("password", "Sup3r-Secret"), ("next", next)],
                None,
            )
            .await;
        response.assert_redirect(urls::NEWS_HOME);
    }
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let app = TestApp::new();
    let hash = auth::hash_password("Sup3r-Secret").unwrap();
    app.repo.create_user("reader", &hash).await.unwrap();

    let response = app
        .post_form(
            urls::LOGIN,
            &[("username", "reader"), ("password", "wrong")],
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.headers.get(header::SET_COOKIE).is_none());
    let page: LoginPage = response.json();
    assert_eq!(
        page.form.errors.field(NON_FIELD_ERRORS),
        [forms::INVALID_LOGIN.to_string()]
    );
    assert_eq!(page.form.data.username, "reader");
    assert_eq!(page.form.data.password, "");
}

#[tokio::test]
async fn test_login_with_unknown_user() {
    let app = TestApp::new();

    let response = app
        .post_form(urls::LOGIN, &[("username", "ghost"), ("password", "x")], None)
        .await;

    let page: LoginPage = response.json();
    assert_eq!(
        page.form.errors.field(NON_FIELD_ERRORS),
        [forms::INVALID_LOGIN.to_string()]
    );
}

#[tokio::test]
async fn test_signup_with_taken_username() {
    let app = TestApp::new();
    app.user("reader").await;

    let response = app
        .post_form(
            urls::SIGNUP,
            &[("username", "reader"), ("password1", "pw-12345"), ("password2", "pw-12345")],
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let page: SignupPage = response.json();
    assert_eq!(
        page.form.errors.field("username"),
        [forms::USERNAME_TAKEN.to_string()]
    );
}

#[tokio::test]
async fn test_signup_with_mismatched_passwords() {
    let app = TestApp::new();

    let response = app
        .post_form(
            urls::SIGNUP,
            &[("username", "reader"), ("password1", "pw-12345"), ("password2", "pw-54321")],
            None,
        )
        .await;

    let page: SignupPage = response.json();
    assert_eq!(
        page.form.errors.field("password2"),
        [forms::PASSWORD_MISMATCH.to_string()]
    );
    assert!(app.repo.get_user_by_username("reader").await.unwrap().is_none());
}

#[tokio::test]
async fn test_logout_clears_session_cookie() {
    let app = TestApp::new();
    let user = app.user("Автор").await;

    let response = app.get(urls::LOGOUT, Some(&user)).await;

    assert_eq!(response.status, StatusCode::OK);
    let set_cookie = response.headers[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.starts_with("jwt=;"));
    assert!(set_cookie.contains("Max-Age=0"));
    let page: MessagePage = response.json();
    assert!(!page.message.is_empty());
}

// --- Passwords ---

#[test]
fn test_password_hash_roundtrip() {
    let hash = auth::hash_password("correct horse").unwrap();

    assert!(hash.starts_with("$argon2"));
    assert!(auth::verify_password("correct horse", &hash));
    assert!(!auth::verify_password("wrong horse", &hash));
    assert!(!auth::verify_password("correct horse", "not-a-phc-string"));
}
