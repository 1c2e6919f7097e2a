use std::env;

/// Fallback signing secret for local runs. Never accepted in production.
const LOCAL_JWT_SECRET: &str = "super-secure-test-secret-value-local";

/// AppConfig
///
/// Holds the application's entire configuration state. Loaded once at startup,
/// immutable afterwards, and pulled into handlers and extractors via `FromRef`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Postgres connection string. `None` selects the in-memory store (local only).
    pub db_url: Option<String>,
    // Runtime environment marker. Controls the development auth bypass and log format.
    pub env: Env,
    // HS256 secret used to sign and validate session tokens.
    pub jwt_secret: String,
    // Address the HTTP listener binds to.
    pub bind_addr: String,
    // Maximum number of news items rendered on the news home page.
    pub news_count_on_home_page: usize,
    // Lifetime of an issued session token, in seconds.
    pub session_ttl_secs: u64,
}

/// Env
///
/// Defines the runtime context, used to switch between development conveniences
/// (header bypass, in-memory store, pretty logs) and the hardened production setup.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// Safe, non-panicking configuration for test scaffolding.
    fn default() -> Self {
        Self {
            db_url: None,
            env: Env::Local,
            jwt_secret: LOCAL_JWT_SECRET.to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
            news_count_on_home_page: 10,
            session_ttl_secs: 14 * 24 * 60 * 60,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads every parameter from environment variables.
    ///
    /// # Panics
    /// Panics if a variable required by the current environment is missing
    /// (`DATABASE_URL` and `JWT_SECRET` in production) or if a numeric
    /// variable cannot be parsed. The service must not start half-configured.
    pub fn load() -> Self {
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        let (db_url, jwt_secret) = match env {
            Env::Production => (
                Some(env::var("DATABASE_URL").expect("FATAL: DATABASE_URL required in prod")),
                env::var("JWT_SECRET").expect("FATAL: JWT_SECRET must be set in production."),
            ),
            Env::Local => (
                env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
                env::var("JWT_SECRET").unwrap_or_else(|_| LOCAL_JWT_SECRET.to_string()),
            ),
        };

        let defaults = Self::default();

        Self {
            db_url,
            env,
            jwt_secret,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            news_count_on_home_page: parse_var("NEWS_COUNT_ON_HOME_PAGE")
                .unwrap_or(defaults.news_count_on_home_page),
            session_ttl_secs: parse_var("SESSION_TTL_SECS").unwrap_or(defaults.session_ttl_secs),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => panic!("FATAL: {name} must be a number, got {raw:?}"),
    }
}
