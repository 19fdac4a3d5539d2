use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints reachable without logging in. Reads never depend on the caller;
/// the auth routes establish and clear the session binding.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for monitoring and load balancers.
        .route("/health", get(|| async { "ok" }))
        // --- Auth ---
        .route("/api/v1/auth/signup", post(handlers::signup))
        .route("/api/v1/auth/login", post(handlers::login))
        .route("/api/v1/auth/logout", get(handlers::logout))
        // GET /api/v1/auth/me
        // 401 envelope when no user is bound to the session.
        .route("/api/v1/auth/me", get(handlers::me))
        // --- Posts (read-only) ---
        .route("/api/v1/posts", get(handlers::list_posts))
        // The static `search` segment takes precedence over `{uuid}`.
        .route("/api/v1/posts/search", get(handlers::search_posts))
        .route("/api/v1/posts/{uuid}", get(handlers::get_post))
        // --- Categories ---
        .route("/api/v1/categories", get(handlers::list_categories))
        .route(
            "/api/v1/categories/{uuid}/posts",
            get(handlers::list_posts_by_category),
        )
}
