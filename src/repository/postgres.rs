use super::{RepoResult, Repository, RepositoryError};
use crate::models::{Category, NewPost, NewUser, Post, User};
use async_trait::async_trait;
use sqlx::PgPool;

// Every post read goes through this projection so `category_name` is always populated.
const POST_SELECT: &str = r#"
    SELECT p.id, p.uuid, p.title, p.content, p.category_id, c.name AS category_name,
           p.user_id, p.created_at, p.updated_at
    FROM posts p
    JOIN categories c ON c.id = p.category_id
"#;

const USER_COLUMNS: &str = "id, uuid, name, email, password_hash, role, created_at";

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by the PostgreSQL database.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Re-reads a post through the joined projection after a write.
    async fn fetch_post(&self, id: i64) -> RepoResult<Option<Post>> {
        let sql = format!("{} WHERE p.id = $1", POST_SELECT);
        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }
}

/// Maps a unique-constraint violation to `RepositoryError::Duplicate`.
fn classify(err: sqlx::Error, what: &str) -> RepositoryError {
    match err.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => RepositoryError::Duplicate(what.to_string()),
        _ => RepositoryError::Database(err),
    }
}

/// Escapes LIKE wildcards so a search term is matched literally.
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl Repository for PostgresRepository {
    // --- USERS ---

    async fn create_user(&self, user: NewUser) -> RepoResult<User> {
        let sql = format!(
            "INSERT INTO users (uuid, name, email, password_hash, role) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&user.uuid)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| classify(e, "email"))
    }

    async fn get_user(&self, id: i64) -> RepoResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    // --- CATEGORIES ---

    async fn list_categories(&self) -> RepoResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, uuid, name, created_at, updated_at FROM categories ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    async fn find_category_by_uuid(&self, uuid: &str) -> RepoResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, uuid, name, created_at, updated_at FROM categories WHERE uuid = $1",
        )
        .bind(uuid)
        .fetch_optional(&self.pool)
        .await?;
        Ok(category)
    }

    /// Names are stored lowercase, so lowering the input is enough for a
    /// case-insensitive match that can still use the unique index.
    async fn find_category_by_name(&self, name: &str) -> RepoResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, uuid, name, created_at, updated_at FROM categories WHERE name = $1",
        )
        .bind(name.to_lowercase())
        .fetch_optional(&self.pool)
        .await?;
        Ok(category)
    }

    // --- POSTS ---

    async fn create_post(&self, post: NewPost) -> RepoResult<Post> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO posts (uuid, title, content, category_id, user_id) VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(&post.uuid)
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.category_id)
        .bind(post.user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify(e, "post uuid"))?;

        self.fetch_post(id)
            .await?
            .ok_or(RepositoryError::Database(sqlx::Error::RowNotFound))
    }

    async fn find_post_by_uuid(&self, uuid: &str) -> RepoResult<Option<Post>> {
        let sql = format!("{} WHERE p.uuid = $1", POST_SELECT);
        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(uuid)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }

    async fn update_post(&self, id: i64, title: &str, content: &str) -> RepoResult<Option<Post>> {
        let result = sqlx::query(
            "UPDATE posts SET title = $2, content = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(title)
        .bind(content)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.fetch_post(id).await
    }

    async fn delete_post(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_posts(&self) -> RepoResult<Vec<Post>> {
        let sql = format!("{} ORDER BY p.id ASC", POST_SELECT);
        let posts = sqlx::query_as::<_, Post>(&sql).fetch_all(&self.pool).await?;
        Ok(posts)
    }

    async fn list_posts_by_category(&self, category_id: i64) -> RepoResult<Vec<Post>> {
        let sql = format!("{} WHERE p.category_id = $1 ORDER BY p.id ASC", POST_SELECT);
        let posts = sqlx::query_as::<_, Post>(&sql)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(posts)
    }

    async fn search_posts(&self, query: &str) -> RepoResult<Vec<Post>> {
        let sql = format!(
            "{} WHERE p.title ILIKE $1 OR p.content ILIKE $1 ORDER BY p.id ASC",
            POST_SELECT
        );
        let posts = sqlx::query_as::<_, Post>(&sql)
            .bind(like_pattern(query))
            .fetch_all(&self.pool)
            .await?;
        Ok(posts)
    }
}
