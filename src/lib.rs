use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod clock;
pub mod config;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod models;
pub mod pages;
pub mod repository;
pub mod slug;
pub mod urls;

// Routing split by access level (public, login required).
pub mod routes;
use auth::AuthUser;
use routes::{authenticated, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use repository::{MemoryRepository, PostgresRepository, RepositoryState};

/// ApiDoc
///
/// Generated OpenAPI document for every route, served at
/// `/api-docs/openapi.json` and browsable through Swagger UI.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::news::news_home, handlers::news::news_detail, handlers::news::create_comment,
        handlers::news::edit_comment_page, handlers::news::edit_comment,
        handlers::news::delete_comment_page, handlers::news::delete_comment,
        handlers::notes::notes_home, handlers::notes::list_notes, handlers::notes::note_detail,
        handlers::notes::add_note_page, handlers::notes::add_note,
        handlers::notes::edit_note_page, handlers::notes::edit_note,
        handlers::notes::delete_note_page, handlers::notes::delete_note,
        handlers::notes::note_success,
        handlers::users::login_page, handlers::users::login, handlers::users::logout,
        handlers::users::signup_page, handlers::users::signup
    ),
    components(
        schemas(
            models::News, models::Comment, models::Note, models::User,
            forms::CommentForm, forms::NoteForm, forms::LoginForm, forms::SignupForm,
            forms::FormErrors,
            pages::NewsHomePage, pages::CommentDeletePage, pages::NotesHomePage,
            pages::NoteListPage, pages::NoteDetailPage, pages::NoteDeletePage,
            pages::MessagePage,
        )
    ),
    tags(
        (name = "ya-portal", description = "News with comments, private notes and accounts")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, cloneable container shared by every request: the store and
/// the immutable configuration.
#[derive(Clone)]
pub struct AppState {
    /// Persistence: Postgres in production, in memory for tests and keyless local runs.
    pub repo: RepositoryState,
    /// The loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// Let extractors (notably `AuthUser`) pull single components out of AppState.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// login_required
///
/// Guards `authenticated_routes`. Extracting `AuthUser` either resolves the
/// requester or rejects with a `302` to the login page carrying `next`, so the
/// handler never runs for anonymous requests.
async fn login_required(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles the routing table, applies the login layer to the protected
/// group and the observability layers to everything.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(
            authenticated::authenticated_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                login_required,
            )),
        )
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                // Every request gets a UUID request id...
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // ...recorded on its tracing span...
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // ...and echoed back to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Builds the per-request span: method, URI and the `x-request-id` set by
/// `SetRequestIdLayer`, so all log lines of one request correlate.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
