use super::{RepoResult, Repository, RepositoryError};
use crate::{
    identifier::generate_uuid,
    models::{Category, NewPost, NewUser, Post, User},
};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    categories: Vec<Category>,
    posts: Vec<Post>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// InMemoryRepository
///
/// A `Repository` kept entirely in process memory. Used by the unit and router tests
/// so handler and service logic can be exercised without a Postgres instance.
/// It mirrors the Postgres constraints that matter to the services: unique emails,
/// lowercase category names and storage-ordered listings.
#[derive(Default)]
pub struct InMemoryRepository {
    tables: RwLock<Tables>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a repository pre-seeded with the given category names.
    pub async fn with_categories(names: &[&str]) -> Self {
        let repo = Self::new();
        for name in names {
            repo.add_category(name).await;
        }
        repo
    }

    /// Inserts a category (name lowercased) and returns it.
    pub async fn add_category(&self, name: &str) -> Category {
        let mut tables = self.tables.write().await;
        let category = Category {
            id: tables.next_id(),
            uuid: generate_uuid(),
            name: name.to_lowercase(),
            created_at: Utc::now(),
            updated_at: None,
        };
        tables.categories.push(category.clone());
        category
    }

    pub async fn post_count(&self) -> usize {
        self.tables.read().await.posts.len()
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn create_user(&self, user: NewUser) -> RepoResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::Duplicate("email".to_string()));
        }
        let created = User {
            id: tables.next_id(),
            uuid: user.uuid,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: Utc::now(),
        };
        tables.users.push(created.clone());
        Ok(created)
    }

    async fn get_user(&self, id: i64) -> RepoResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_categories(&self) -> RepoResult<Vec<Category>> {
        let tables = self.tables.read().await;
        let mut categories = tables.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_category_by_uuid(&self, uuid: &str) -> RepoResult<Option<Category>> {
        let tables = self.tables.read().await;
        Ok(tables.categories.iter().find(|c| c.uuid == uuid).cloned())
    }

    async fn find_category_by_name(&self, name: &str) -> RepoResult<Option<Category>> {
        let name = name.to_lowercase();
        let tables = self.tables.read().await;
        Ok(tables.categories.iter().find(|c| c.name == name).cloned())
    }

    async fn create_post(&self, post: NewPost) -> RepoResult<Post> {
        let mut tables = self.tables.write().await;
        // Foreign keys: refuse orphans the same way Postgres would.
        let category_name = tables
            .categories
            .iter()
            .find(|c| c.id == post.category_id)
            .map(|c| c.name.clone())
            .ok_or(RepositoryError::Database(sqlx::Error::RowNotFound))?;
        if !tables.users.iter().any(|u| u.id == post.user_id) {
            return Err(RepositoryError::Database(sqlx::Error::RowNotFound));
        }
        if tables.posts.iter().any(|p| p.uuid == post.uuid) {
            return Err(RepositoryError::Duplicate("post uuid".to_string()));
        }

        let created = Post {
            id: tables.next_id(),
            uuid: post.uuid,
            title: post.title,
            content: post.content,
            category_id: post.category_id,
            category_name,
            user_id: post.user_id,
            created_at: Utc::now(),
            updated_at: None,
        };
        tables.posts.push(created.clone());
        Ok(created)
    }

    async fn find_post_by_uuid(&self, uuid: &str) -> RepoResult<Option<Post>> {
        let tables = self.tables.read().await;
        Ok(tables.posts.iter().find(|p| p.uuid == uuid).cloned())
    }

    async fn update_post(&self, id: i64, title: &str, content: &str) -> RepoResult<Option<Post>> {
        let mut tables = self.tables.write().await;
        Ok(tables.posts.iter_mut().find(|p| p.id == id).map(|post| {
            post.title = title.to_string();
            post.content = content.to_string();
            post.updated_at = Some(Utc::now());
            post.clone()
        }))
    }

    async fn delete_post(&self, id: i64) -> RepoResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.posts.len();
        tables.posts.retain(|p| p.id != id);
        Ok(tables.posts.len() < before)
    }

    async fn list_posts(&self) -> RepoResult<Vec<Post>> {
        Ok(self.tables.read().await.posts.clone())
    }

    async fn list_posts_by_category(&self, category_id: i64) -> RepoResult<Vec<Post>> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .iter()
            .filter(|p| p.category_id == category_id)
            .cloned()
            .collect())
    }

    async fn search_posts(&self, query: &str) -> RepoResult<Vec<Post>> {
        let needle = query.to_lowercase();
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .iter()
            .filter(|p| {
                p.title.to_lowercase().contains(&needle) || p.content.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect())
    }
}
