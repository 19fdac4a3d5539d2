use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{post, put},
};

/// Admin Router Module
///
/// Post mutations. Only users with the 'admin' role may use them, but the role
/// check is performed by the post service rather than a layer, so the handlers
/// can still tell "log in first" (401) apart from "not allowed" (403).
///
/// Merged with the public routes, so the shared paths (`/api/v1/posts`,
/// `/api/v1/posts/{uuid}`) keep their GET handlers.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // POST /api/v1/posts
        .route("/api/v1/posts", post(handlers::create_post))
        // PUT/DELETE /api/v1/posts/{uuid}
        .route(
            "/api/v1/posts/{uuid}",
            put(handlers::edit_post).delete(handlers::delete_post),
        )
}
