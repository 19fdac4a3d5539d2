use crate::{error::ServiceError, models::CategoryResponse, repository::RepositoryState};

/// CategoryService
///
/// Read-only category access. Categories are seeded by migration; clients use this
/// listing to discover the identifiers accepted by the by-category post listing.
#[derive(Clone)]
pub struct CategoryService {
    repo: RepositoryState,
}

impl CategoryService {
    pub fn new(repo: RepositoryState) -> Self {
        Self { repo }
    }

    /// Every category, ordered by name.
    pub async fn list_categories(&self) -> Result<Vec<CategoryResponse>, ServiceError> {
        let categories = self.repo.list_categories().await?;
        Ok(categories.into_iter().map(CategoryResponse::from).collect())
    }
}
