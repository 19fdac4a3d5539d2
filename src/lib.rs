use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
};
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore, cookie::SameSite};
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

// Core application services and components.
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod identifier;
pub mod models;
pub mod repository;
pub mod response;
pub mod services;

// Routing segregation (Public, Admin).
pub mod routes;
use routes::{admin, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::ServiceError;
pub use repository::{InMemoryRepository, PostgresRepository, RepositoryState};
pub use services::{CategoryService, PostService, UserService};

/// ApiDoc
///
/// Auto-generates the OpenAPI document from the `#[utoipa::path]` handlers and the
/// `ToSchema` models. Served at `/api-docs/openapi.json`, browsable at `/swagger-ui`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::signup, handlers::login, handlers::logout, handlers::me,
        handlers::create_post, handlers::edit_post, handlers::delete_post,
        handlers::list_posts, handlers::get_post, handlers::search_posts,
        handlers::list_categories, handlers::list_posts_by_category
    ),
    components(
        schemas(
            models::Role, models::SignupRequest, models::LoginRequest, models::UserProfile,
            models::PostRequest, models::UpdatePostRequest, models::PostResponse,
            models::CategoryResponse,
        )
    ),
    tags(
        (name = "fashion-blog", description = "Fashion Blog API")
    )
)]
pub struct ApiDoc;

/// AppState
///
/// The single, cloneable container of everything handlers need. Services are
/// derived from it on demand through `FromRef`.
#[derive(Clone)]
pub struct AppState {
    /// Repository Layer: Postgres in production, in-memory in tests.
    pub repo: RepositoryState,
    /// Configuration: The loaded, immutable environment configuration.
    pub config: AppConfig,
}

impl AppState {
    pub fn new(repo: RepositoryState, config: AppConfig) -> Self {
        Self { repo, config }
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for PostService {
    fn from_ref(app_state: &AppState) -> PostService {
        PostService::new(app_state.repo.clone())
    }
}

impl FromRef<AppState> for UserService {
    fn from_ref(app_state: &AppState) -> UserService {
        UserService::new(app_state.repo.clone())
            .with_admin_emails(app_state.config.admin_emails.clone())
    }
}

impl FromRef<AppState> for CategoryService {
    fn from_ref(app_state: &AppState) -> CategoryService {
        CategoryService::new(app_state.repo.clone())
    }
}

/// create_router
///
/// Assembles the routing structure, the session layer backed by `session_store`, and the
/// observability layers, and registers the application state.
pub fn create_router<Store>(state: AppState, session_store: Store) -> Router
where
    Store: SessionStore + Clone,
{
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // Cookie-based login sessions. Expire after a period of inactivity.
    let sessions = SessionManagerLayer::new(session_store)
        .with_secure(state.config.secure_cookies())
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            state.config.session_idle_minutes,
        )));

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        // Admin routes share paths with the public reads; merging combines their methods.
        .merge(admin::admin_routes())
        .with_state(state)
        .layer(sessions);

    base_router
        .layer(
            ServiceBuilder::new()
                // Request ID Generation: a unique UUID for every incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // Request Tracing: wraps the request/response lifecycle in a span.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // Request ID Propagation: echoes x-request-id back to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Builds the per-request span with method, URI and the `x-request-id` header,
/// so every log line for one request is correlated.
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
