use crate::{
    auth::{self, CurrentUser},
    error::ServiceError,
    models::{
        CategoryResponse, LoginRequest, PostRequest, PostResponse, SignupRequest,
        UpdatePostRequest, UserProfile,
    },
    response::{ApiResponse, Enveloped},
    services::{CategoryService, PostService, UserService},
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tower_sessions::Session;
use validator::Validate;

/// Handler result: a status-tagged success envelope, or a `ServiceError` that
/// renders as an error envelope.
pub type ApiResult<T> = Result<Enveloped<T>, ServiceError>;

// --- Query Structs ---

/// SearchQuery
///
/// Query parameters for GET /api/v1/posts/search.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct SearchQuery {
    /// Free text matched against post titles and content, ignoring case.
    #[serde(default)]
    pub q: String,
}

// --- Auth Handlers ---

/// signup
///
/// [Public Route] Creates an account. Does not log the new user in.
/// The role is never taken from the request.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<UserProfile>),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn signup(
    State(users): State<UserService>,
    Json(payload): Json<SignupRequest>,
) -> ApiResult<UserProfile> {
    let payload = payload.trimmed();
    payload.validate()?;
    let user = users.signup(payload).await?;
    Ok(Enveloped::created(UserProfile::from(&user)))
}

/// login
///
/// [Public Route] Verifies credentials and binds the user to the session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = ApiResponse<UserProfile>),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    session: Session,
    State(users): State<UserService>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<UserProfile> {
    payload.validate()?;
    let user = users.login(payload).await?;
    auth::bind_session(&session, &user).await?;
    Ok(Enveloped::ok(UserProfile::from(&user)))
}

/// logout
///
/// [Public Route] Clears the session binding. Succeeds for anonymous callers too.
#[utoipa::path(
    get,
    path = "/api/v1/auth/logout",
    responses((status = 200, description = "Logged out", body = ApiResponse<String>))
)]
pub async fn logout(session: Session) -> ApiResult<String> {
    auth::clear_session(&session).await?;
    Ok(Enveloped::ok("Logged out successfully".to_string()))
}

/// me
///
/// [Authenticated Route] Returns the profile bound to the current session.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Profile", body = ApiResponse<UserProfile>),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn me(current: CurrentUser) -> ApiResult<UserProfile> {
    let user = current
        .user()
        .ok_or_else(|| ServiceError::unauthenticated("Not logged in", "No user in session"))?;
    Ok(Enveloped::ok(UserProfile::from(user)))
}

// --- Post Handlers ---

/// create_post
///
/// [Admin Route] Publishes a post in an existing category. The author is the session user.
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    request_body = PostRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<PostResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Category does not exist")
    )
)]
pub async fn create_post(
    current: CurrentUser,
    State(posts): State<PostService>,
    Json(payload): Json<PostRequest>,
) -> ApiResult<PostResponse> {
    payload.validate()?;
    let post = posts.create_post(current.user(), payload).await?;
    Ok(Enveloped::created(post))
}

/// edit_post
///
/// [Admin Route] Replaces a post's title and content.
#[utoipa::path(
    put,
    path = "/api/v1/posts/{uuid}",
    params(("uuid" = String, Path, description = "Post external identifier")),
    request_body = UpdatePostRequest,
    responses(
        (status = 202, description = "Updated", body = ApiResponse<PostResponse>),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "No such post")
    )
)]
pub async fn edit_post(
    current: CurrentUser,
    State(posts): State<PostService>,
    Path(uuid): Path<String>,
    Json(payload): Json<UpdatePostRequest>,
) -> ApiResult<PostResponse> {
    payload.validate()?;
    let post = posts.edit_post(current.user(), &uuid, payload).await?;
    Ok(Enveloped::accepted(post))
}

/// delete_post
///
/// [Admin Route] Permanently removes a post.
#[utoipa::path(
    delete,
    path = "/api/v1/posts/{uuid}",
    params(("uuid" = String, Path, description = "Post external identifier")),
    responses(
        (status = 202, description = "Deleted", body = ApiResponse<String>),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "No such post")
    )
)]
pub async fn delete_post(
    current: CurrentUser,
    State(posts): State<PostService>,
    Path(uuid): Path<String>,
) -> ApiResult<String> {
    let message = posts.delete_post(current.user(), &uuid).await?;
    Ok(Enveloped::accepted(message))
}

/// list_posts
///
/// [Public Route] Every post, in storage order.
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    responses((status = 200, description = "All posts", body = ApiResponse<Vec<PostResponse>>))
)]
pub async fn list_posts(State(posts): State<PostService>) -> ApiResult<Vec<PostResponse>> {
    Ok(Enveloped::ok(posts.list_posts().await?))
}

/// get_post
///
/// [Public Route] A single post by its external identifier.
#[utoipa::path(
    get,
    path = "/api/v1/posts/{uuid}",
    params(("uuid" = String, Path, description = "Post external identifier")),
    responses(
        (status = 200, description = "Found", body = ApiResponse<PostResponse>),
        (status = 404, description = "No such post")
    )
)]
pub async fn get_post(
    State(posts): State<PostService>,
    Path(uuid): Path<String>,
) -> ApiResult<PostResponse> {
    Ok(Enveloped::ok(posts.get_post(&uuid).await?))
}

/// search_posts
///
/// [Public Route] Case-insensitive search over titles and content.
/// No match is reported as 404 rather than an empty list.
#[utoipa::path(
    get,
    path = "/api/v1/posts/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching posts", body = ApiResponse<Vec<PostResponse>>),
        (status = 400, description = "Empty query"),
        (status = 404, description = "No post matches")
    )
)]
pub async fn search_posts(
    State(posts): State<PostService>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Vec<PostResponse>> {
    Ok(Enveloped::ok(posts.search_posts(&query.q).await?))
}

// --- Category Handlers ---

/// list_categories
///
/// [Public Route] Every category with its external identifier.
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    responses((status = 200, description = "All categories", body = ApiResponse<Vec<CategoryResponse>>))
)]
pub async fn list_categories(
    State(categories): State<CategoryService>,
) -> ApiResult<Vec<CategoryResponse>> {
    Ok(Enveloped::ok(categories.list_categories().await?))
}

/// list_posts_by_category
///
/// [Public Route] Posts in one category, addressed by the category's external identifier.
#[utoipa::path(
    get,
    path = "/api/v1/categories/{uuid}/posts",
    params(("uuid" = String, Path, description = "Category external identifier")),
    responses(
        (status = 200, description = "Posts in category", body = ApiResponse<Vec<PostResponse>>),
        (status = 404, description = "No such category")
    )
)]
pub async fn list_posts_by_category(
    State(posts): State<PostService>,
    Path(uuid): Path<String>,
) -> ApiResult<Vec<PostResponse>> {
    Ok(Enveloped::ok(posts.list_posts_by_category(&uuid).await?))
}
