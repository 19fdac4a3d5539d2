use crate::{
    error::ServiceError,
    identifier::generate_uuid,
    models::{NewPost, Post, PostRequest, PostResponse, UpdatePostRequest, User},
    repository::RepositoryState,
    services::{AdminAction, require_admin},
};

/// PostService
///
/// Post lifecycle: admin-only create/edit/delete, public reads and search.
/// Every operation that needs authorization takes the caller explicitly.
#[derive(Clone)]
pub struct PostService {
    repo: RepositoryState,
}

impl PostService {
    pub fn new(repo: RepositoryState) -> Self {
        Self { repo }
    }

    /// Creates a post in the named category (matched case-insensitively), authored by the caller.
    pub async fn create_post(
        &self,
        caller: Option<&User>,
        request: PostRequest,
    ) -> Result<PostResponse, ServiceError> {
        let author = require_admin(caller, AdminAction::CreatePost)?;

        let category = self
            .repo
            .find_category_by_name(&request.category.to_lowercase())
            .await?
            .ok_or_else(|| {
                ServiceError::not_found("Category does not exist", "Enter a valid category name")
            })?;

        let post = self
            .repo
            .create_post(NewPost {
                uuid: generate_uuid(),
                title: request.title,
                content: request.content,
                category_id: category.id,
                user_id: author.id,
            })
            .await?;

        tracing::info!(post = %post.uuid, category = %post.category_name, "post created");
        Ok(post.into())
    }

    /// Overwrites a post's title and content. Category and author stay as created.
    pub async fn edit_post(
        &self,
        caller: Option<&User>,
        uuid: &str,
        request: UpdatePostRequest,
    ) -> Result<PostResponse, ServiceError> {
        require_admin(caller, AdminAction::EditPost)?;

        let post = self.find_post(uuid).await?;
        let updated = self
            .repo
            .update_post(post.id, &request.title, &request.content)
            .await?
            // Deleted between the lookup and the update.
            .ok_or_else(|| post_not_found(uuid))?;

        tracing::info!(post = %updated.uuid, "post edited");
        Ok(updated.into())
    }

    /// Permanently removes a post and returns a confirmation message.
    pub async fn delete_post(&self, caller: Option<&User>, uuid: &str) -> Result<String, ServiceError> {
        require_admin(caller, AdminAction::DeletePost)?;

        let post = self.find_post(uuid).await?;
        if !self.repo.delete_post(post.id).await? {
            return Err(post_not_found(uuid));
        }

        tracing::info!(post = %post.uuid, "post deleted");
        Ok("Post deleted successfully!".to_string())
    }

    /// Every post, in storage order.
    pub async fn list_posts(&self) -> Result<Vec<PostResponse>, ServiceError> {
        Ok(into_views(self.repo.list_posts().await?))
    }

    /// Posts belonging to the category with the given external identifier.
    pub async fn list_posts_by_category(
        &self,
        category_uuid: &str,
    ) -> Result<Vec<PostResponse>, ServiceError> {
        let category = self
            .repo
            .find_category_by_uuid(category_uuid)
            .await?
            .ok_or_else(|| {
                ServiceError::not_found(
                    "No such category",
                    format!("{} does not exist in the database", category_uuid),
                )
            })?;

        Ok(into_views(self.repo.list_posts_by_category(category.id).await?))
    }

    pub async fn get_post(&self, uuid: &str) -> Result<PostResponse, ServiceError> {
        Ok(self.find_post(uuid).await?.into())
    }

    /// Free-text search over title and content. An empty result is a `NotFound`.
    pub async fn search_posts(&self, query: &str) -> Result<Vec<PostResponse>, ServiceError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ServiceError::validation(
                "Invalid search query",
                "Search query cannot be empty",
            ));
        }

        let posts = self.repo.search_posts(query).await?;
        if posts.is_empty() {
            return Err(ServiceError::not_found(
                "No Post found",
                format!("{} is not found in any post", query),
            ));
        }
        Ok(into_views(posts))
    }

    async fn find_post(&self, uuid: &str) -> Result<Post, ServiceError> {
        self.repo
            .find_post_by_uuid(uuid)
            .await?
            .ok_or_else(|| post_not_found(uuid))
    }
}

fn post_not_found(uuid: &str) -> ServiceError {
    ServiceError::not_found("No such post", format!("Post with uuid {} does not exist", uuid))
}

fn into_views(posts: Vec<Post>) -> Vec<PostResponse> {
    posts.into_iter().map(PostResponse::from).collect()
}
