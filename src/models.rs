use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use validator::Validate;

// --- Core Application Schemas (Mapped to Database) ---

/// Role
///
/// The RBAC field of a user. Stored as the Postgres enum `user_role`.
/// Only `Admin` may create, edit or delete posts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, sqlx::Type, Default,
)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Regular,
}

/// User
///
/// Canonical account record from the `users` table. The password hash never
/// leaves the server; use `UserProfile` for anything sent to a client.
#[derive(Debug, Clone, FromRow, Default)]
pub struct User {
    pub id: i64,
    pub uuid: String,
    pub name: String,
    // Always stored lowercase.
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Category
///
/// A post category from the `categories` table. Names are unique and stored lowercase.
#[derive(Debug, Clone, FromRow, Default)]
pub struct Category {
    pub id: i64,
    pub uuid: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Post
///
/// A row from the `posts` table joined with the owning category's name.
/// Every repository read returns this shape so the response view never needs
/// a second lookup.
#[derive(Debug, Clone, FromRow, Default)]
pub struct Post {
    pub id: i64,
    pub uuid: String,
    pub title: String,
    pub content: String,
    pub category_id: i64,
    // Loaded via a JOIN on `categories`.
    pub category_name: String,
    // FK to users.id (author).
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// NewUser
///
/// Insert payload handed to the repository after the password has been hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub uuid: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// NewPost
///
/// Insert payload for a post once the category and author have been resolved.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub uuid: String,
    pub title: String,
    pub content: String,
    pub category_id: i64,
    pub user_id: i64,
}

// --- Request Payloads (Input Schemas) ---

/// SignupRequest
///
/// Input payload for account creation (POST /api/v1/auth/signup).
/// There is no role field: public signups are always `regular`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

impl SignupRequest {
    /// Strips surrounding whitespace from name and email. Run before `validate()`
    /// so the rules see the values that get stored.
    pub fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password,
        }
    }
}

/// LoginRequest
///
/// Input payload for POST /api/v1/auth/login.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email cannot be empty"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
}

/// PostRequest
///
/// Input payload for creating a post (POST /api/v1/posts).
/// `category` is a category name, matched case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct PostRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    #[schema(example = "Fall Drop")]
    pub title: String,
    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: String,
    #[validate(length(min = 1, max = 50, message = "Category must be between 1 and 50 characters"))]
    #[schema(example = "Streetwear")]
    pub category: String,
}

/// UpdatePostRequest
///
/// Input payload for editing a post (PUT /api/v1/posts/{uuid}).
/// A post's category and author are fixed at creation, so only the text can change.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: String,
}

// --- Response Views (Output Schemas) ---

/// PostResponse
///
/// The client-facing view of a post. Every post read, including search,
/// returns this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct PostResponse {
    pub uuid: String,
    pub title: String,
    pub content: String,
    /// The category's (lowercase) name.
    pub category: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            uuid: post.uuid,
            title: post.title,
            content: post.content,
            category: post.category_name,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// CategoryResponse
///
/// Public view of a category, used by clients to find category identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CategoryResponse {
    pub uuid: String,
    pub name: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            uuid: category.uuid,
            name: category.name,
        }
    }
}

/// UserProfile
///
/// Output schema for signup, login and GET /api/v1/auth/me.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UserProfile {
    pub uuid: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            uuid: user.uuid.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}
