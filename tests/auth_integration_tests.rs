use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use fashion_blog::{AppConfig, AppState, InMemoryRepository, create_router};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

// --- Test Harness ---

// The only address provisioned as admin through `ADMIN_EMAILS`.
const ADMIN_EMAIL: &str = "admin@blog.test";

struct TestApp {
    router: Router,
}

struct TestResponse {
    status: StatusCode,
    cookie: Option<String>,
    body: Value,
}

impl TestApp {
    async fn spawn() -> Self {
        let repo = InMemoryRepository::with_categories(&["streetwear", "vintage"]).await;
        let config = AppConfig {
            admin_emails: vec![ADMIN_EMAIL.to_string()],
            ..AppConfig::default()
        };
        let state = AppState::new(Arc::new(repo), config);
        Self {
            router: create_router(state, MemoryStore::default()),
        }
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        // Keep only the `name=value` pair of the session cookie.
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_string);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse {
            status,
            cookie,
            body,
        }
    }

    async fn signup(&self, email: &str) -> TestResponse {
        self.signup_with(json!({ "name": "Tester", "email": email, "password": "password123" }))
            .await
    }

    async fn signup_with(&self, body: Value) -> TestResponse {
        self.send("POST", "/api/v1/auth/signup", None, Some(body)).await
    }

    /// Signs up and logs in, returning the session cookie.
    async fn login_as(&self, email: &str) -> String {
        let signup = self.signup(email).await;
        assert_eq!(signup.status, StatusCode::CREATED, "{}", signup.body);
        self.login(email).await
    }

    async fn login(&self, email: &str) -> String {
        let login = self
            .send(
                "POST",
                "/api/v1/auth/login",
                None,
                Some(json!({ "email": email, "password": "password123" })),
            )
            .await;
        assert_eq!(login.status, StatusCode::OK, "{}", login.body);
        login.cookie.expect("login must set a session cookie")
    }
}

fn fall_drop() -> Value {
    json!({ "title": "Fall Drop", "content": "Layered knits.", "category": "Streetwear" })
}

// --- Tests ---

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::spawn().await;
    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_anonymous_create_is_unauthenticated() {
    let app = TestApp::spawn().await;
    let response = app.send("POST", "/api/v1/posts", None, Some(fall_drop())).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["hint"], "No user in session");
}

#[tokio::test]
async fn test_regular_user_create_is_unauthorized() {
    let app = TestApp::spawn().await;
    let cookie = app.login_as("reader@blog.test").await;

    let response = app
        .send("POST", "/api/v1/posts", Some(&cookie), Some(fall_drop()))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["message"], "Unauthorized user");
}

#[tokio::test]
async fn test_signup_cannot_self_assign_admin_role() {
    let app = TestApp::spawn().await;

    let signup = app
        .signup_with(json!({
            "name": "Mallory",
            "email": "mallory@blog.test",
            "password": "password123",
            "role": "admin"
        }))
        .await;
    assert_eq!(signup.status, StatusCode::CREATED);
    assert_eq!(signup.body["data"]["role"], "regular");

    let cookie = app.login("mallory@blog.test").await;
    let response = app
        .send("POST", "/api/v1/posts", Some(&cookie), Some(fall_drop()))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let all = app.send("GET", "/api/v1/posts", None, None).await;
    assert_eq!(all.body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_signup_trims_before_validating() {
    let app = TestApp::spawn().await;

    let blank_name = app
        .signup_with(json!({ "name": "   ", "email": "blank@blog.test", "password": "password123" }))
        .await;
    assert_eq!(blank_name.status, StatusCode::BAD_REQUEST);
    assert!(blank_name.body["hint"].as_str().unwrap().contains("name"));

    let padded = app
        .signup_with(json!({ "name": " Ada ", "email": "  Ada@Blog.test ", "password": "password123" }))
        .await;
    assert_eq!(padded.status, StatusCode::CREATED, "{}", padded.body);
    assert_eq!(padded.body["data"]["name"], "Ada");
    assert_eq!(padded.body["data"]["email"], "ada@blog.test");
}

#[tokio::test]
async fn test_admin_post_lifecycle() {
    let app = TestApp::spawn().await;
    let cookie = app.login_as(ADMIN_EMAIL).await;

    // Create: category matched case-insensitively, echoed lowercase.
    let created = app
        .send("POST", "/api/v1/posts", Some(&cookie), Some(fall_drop()))
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);
    assert_eq!(created.body["data"]["category"], "streetwear");
    let uuid = created.body["data"]["uuid"].as_str().unwrap().to_string();

    // Fetch (anonymous).
    let fetched = app.send("GET", &format!("/api/v1/posts/{}", uuid), None, None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["data"]["title"], "Fall Drop");
    assert_eq!(fetched.body["data"]["content"], "Layered knits.");

    // Edit.
    let edited = app
        .send(
            "PUT",
            &format!("/api/v1/posts/{}", uuid),
            Some(&cookie),
            Some(json!({ "title": "Fall Drop II", "content": "More knits." })),
        )
        .await;
    assert_eq!(edited.status, StatusCode::ACCEPTED);
    assert_eq!(edited.body["data"]["title"], "Fall Drop II");
    assert_eq!(edited.body["data"]["category"], "streetwear");

    // Delete.
    let deleted = app
        .send("DELETE", &format!("/api/v1/posts/{}", uuid), Some(&cookie), None)
        .await;
    assert_eq!(deleted.status, StatusCode::ACCEPTED);
    assert_eq!(deleted.body["data"], "Post deleted successfully!");

    let gone = app.send("GET", &format!("/api/v1/posts/{}", uuid), None, None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(gone.body["message"], "No such post");
}

#[tokio::test]
async fn test_create_with_unknown_category_is_not_found() {
    let app = TestApp::spawn().await;
    let cookie = app.login_as(ADMIN_EMAIL).await;

    let response = app
        .send(
            "POST",
            "/api/v1/posts",
            Some(&cookie),
            Some(json!({ "title": "Gala", "content": "Gowns.", "category": "couture" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "Category does not exist");

    let all = app.send("GET", "/api/v1/posts", None, None).await;
    assert_eq!(all.body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_logout_clears_session() {
    let app = TestApp::spawn().await;
    let cookie = app.login_as(ADMIN_EMAIL).await;

    let me = app.send("GET", "/api/v1/auth/me", Some(&cookie), None).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["data"]["role"], "admin");

    let logout = app.send("GET", "/api/v1/auth/logout", Some(&cookie), None).await;
    assert_eq!(logout.status, StatusCode::OK);

    let after = app
        .send("POST", "/api/v1/posts", Some(&cookie), Some(fall_drop()))
        .await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);

    let me = app.send("GET", "/api/v1/auth/me", Some(&cookie), None).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let app = TestApp::spawn().await;
    app.signup("reader@blog.test").await;

    let response = app
        .send(
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "reader@blog.test", "password": "nope-nope" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.cookie.is_none());
    assert_eq!(response.body["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_signup_conflict_and_validation() {
    let app = TestApp::spawn().await;
    assert_eq!(app.signup("reader@blog.test").await.status, StatusCode::CREATED);

    let duplicate = app.signup("Reader@Blog.test").await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let invalid = app.signup("not-an-email").await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    assert_eq!(invalid.body["success"], false);
}

#[tokio::test]
async fn test_search_and_category_listing() {
    let app = TestApp::spawn().await;
    let cookie = app.login_as(ADMIN_EMAIL).await;

    app.send("POST", "/api/v1/posts", Some(&cookie), Some(fall_drop())).await;
    app.send(
        "POST",
        "/api/v1/posts",
        Some(&cookie),
        Some(json!({ "title": "Thrift haul", "content": "Old denim.", "category": "vintage" })),
    )
    .await;

    let hits = app.send("GET", "/api/v1/posts/search?q=DENIM", None, None).await;
    assert_eq!(hits.status, StatusCode::OK);
    let hits = hits.body["data"].as_array().unwrap().clone();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["title"], "Thrift haul");
    assert_eq!(hits[0]["category"], "vintage");

    let misses = app.send("GET", "/api/v1/posts/search?q=ballgown", None, None).await;
    assert_eq!(misses.status, StatusCode::NOT_FOUND);

    let categories = app.send("GET", "/api/v1/categories", None, None).await;
    let vintage_uuid = categories.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == "vintage")
        .and_then(|c| c["uuid"].as_str())
        .unwrap()
        .to_string();

    let listed = app
        .send("GET", &format!("/api/v1/categories/{}/posts", vintage_uuid), None, None)
        .await;
    assert_eq!(listed.status, StatusCode::OK);
    let listed = listed.body["data"].as_array().unwrap().clone();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["title"], "Thrift haul");

    let unknown = app.send("GET", "/api/v1/categories/missing/posts", None, None).await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}
