use crate::models::{Category, NewPost, NewUser, Post, User};
use async_trait::async_trait;
use std::sync::Arc;

mod memory;
mod postgres;

pub use memory::InMemoryRepository;
pub use postgres::PostgresRepository;

/// RepositoryError
///
/// Failures surfaced by the persistence layer. Unique-constraint violations are
/// split out so the service can answer with a conflict instead of a 500.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("duplicate value for {0}")]
    Duplicate(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type RepoResult<T> = Result<T, RepositoryError>;

/// Repository Trait
///
/// Defines the abstract contract for all persistence operations, so the services
/// can work against Postgres in production and the in-memory store in tests.
///
/// **Send + Sync + async_trait** are required to make the trait object (`Arc<dyn Repository>`)
/// safely shareable across Axum's asynchronous task boundaries.
///
/// Lookups return `Ok(None)` for a missing row; only storage failures are errors.
/// Every `Post` returned carries its category name.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users ---
    async fn create_user(&self, user: NewUser) -> RepoResult<User>;
    async fn get_user(&self, id: i64) -> RepoResult<Option<User>>;
    // `email` must already be lowercased.
    async fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    // --- Categories ---
    async fn list_categories(&self) -> RepoResult<Vec<Category>>;
    async fn find_category_by_uuid(&self, uuid: &str) -> RepoResult<Option<Category>>;
    // Case-insensitive match on the category name.
    async fn find_category_by_name(&self, name: &str) -> RepoResult<Option<Category>>;

    // --- Posts ---
    async fn create_post(&self, post: NewPost) -> RepoResult<Post>;
    async fn find_post_by_uuid(&self, uuid: &str) -> RepoResult<Option<Post>>;
    // Overwrites title and content and stamps `updated_at`. `None` if the post vanished.
    async fn update_post(&self, id: i64, title: &str, content: &str) -> RepoResult<Option<Post>>;
    // Returns true if a row was removed.
    async fn delete_post(&self, id: i64) -> RepoResult<bool>;
    // Storage order: ascending internal id.
    async fn list_posts(&self) -> RepoResult<Vec<Post>>;
    async fn list_posts_by_category(&self, category_id: i64) -> RepoResult<Vec<Post>>;
    // Case-insensitive substring match over title and content.
    async fn search_posts(&self, query: &str) -> RepoResult<Vec<Post>>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer access across the application state.
pub type RepositoryState = Arc<dyn Repository>;
