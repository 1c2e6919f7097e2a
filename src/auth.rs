use std::convert::Infallible;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    extract::{FromRef, FromRequestParts, OriginalUri},
    http::{header, request::Parts},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::{AppConfig, Env},
    error::AppError,
    repository::RepositoryState,
    urls,
};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "jwt";

/// Claims
///
/// Payload of a session token. Signed with the configured secret (HS256) and
/// validated on every request.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's id. Must still resolve to a stored user.
    pub sub: Uuid,
    /// Expiration time (seconds since the epoch).
    pub exp: usize,
    /// Issued at (seconds since the epoch).
    pub iat: usize,
}

/// AuthUser
///
/// The resolved identity of an authenticated request. Using it as a handler
/// argument makes the handler login-only: anonymous requests are answered
/// with a redirect to the login page before the handler runs.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
}

/// CurrentUser
///
/// The requester's identity on pages open to everyone. Never rejects.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<AuthUser>);

/// LoginRedirect
///
/// Rejection of `AuthUser`: `302 Found` to the login page with `next` set to
/// the path (and query) originally requested.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginRedirect {
    pub next: String,
}

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        crate::handlers::found(urls::login_redirect(&self.next))
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = LoginRedirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match resolve_user(parts, state).await {
            Some(user) => Ok(user),
            None => Err(LoginRedirect {
                next: requested_path(parts),
            }),
        }
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentUser(resolve_user(parts, state).await))
    }
}

/// resolve_user
///
/// Resolves the requester in this order:
/// 1. `Env::Local` only: the `x-user-id` header naming an existing user.
/// 2. `Authorization: Bearer <token>`.
/// 3. The `jwt` session cookie.
///
/// A token must carry a valid signature, be unexpired and name a user that
/// still exists. Any failure yields `None` (anonymous).
async fn resolve_user<S>(parts: &Parts, state: &S) -> Option<AuthUser>
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    let repo = RepositoryState::from_ref(state);
    let config = AppConfig::from_ref(state);

    if config.env == Env::Local {
        let header_id = parts
            .headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .and_then(|id| Uuid::parse_str(id).ok());
        if let Some(user_id) = header_id {
            if let Some(user) = load_user(&repo, user_id).await {
                return Some(user);
            }
        }
    }

    let token = bearer_token(parts).or_else(|| session_cookie(parts))?;
    let claims = match decode_token(&config, &token) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::debug!(error = %err, "rejected session token");
            return None;
        }
    };
    load_user(&repo, claims.sub).await
}

async fn load_user(repo: &RepositoryState, id: Uuid) -> Option<AuthUser> {
    match repo.get_user(id).await {
        Ok(user) => user.map(|u| AuthUser {
            id: u.id,
            username: u.username,
        }),
        Err(err) => {
            tracing::error!(error = %err, "user lookup failed during authentication");
            None
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn session_cookie(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Path and query of the request as the client sent it, before any nesting.
fn requested_path(parts: &Parts) -> String {
    let uri = parts
        .extensions
        .get::<OriginalUri>()
        .map(|original| &original.0)
        .unwrap_or(&parts.uri);
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

// --- Tokens ---

/// Signs a session token for `user_id`, valid for `session_ttl_secs`.
pub fn issue_token(config: &AppConfig, user_id: Uuid) -> Result<String, AppError> {
    let now = Utc::now().timestamp().max(0) as usize;
    let claims = Claims {
        sub: user_id,
        iat: now,
        exp: now + config.session_ttl_secs as usize,
    };
    let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
    Ok(encode(&Header::default(), &claims, &key)?)
}

/// Validates signature and expiry of `token`.
pub fn decode_token(
    config: &AppConfig,
    token: &str,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
    let mut validation = Validation::default();
    validation.validate_exp = true;
    decode::<Claims>(token, &key, &validation).map(|data| data.claims)
}

/// `Set-Cookie` value storing `token` for the configured session lifetime.
pub fn session_cookie_header(config: &AppConfig, token: &str) -> String {
    format!(
        "{SESSION_COOKIE}={token}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
        config.session_ttl_secs
    )
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie_header() -> String {
    format!("{SESSION_COOKIE}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0")
}

// --- Passwords ---

/// Hashes `password` with argon2 and a fresh random salt (PHC string).
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Checks `password` against a stored PHC hash. A malformed hash never matches.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let hash = match PasswordHash::new(password_hash) {
        Ok(hash) => hash,
        Err(err) => {
            tracing::error!("failed to parse password hash: {}", err);
            return false;
        }
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &hash)
        .is_ok()
}
