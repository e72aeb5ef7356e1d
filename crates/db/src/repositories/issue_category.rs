//! Issue category repository.

use std::sync::Arc;

use hosteldesk_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder,
};

use crate::entities::{IssueCategory, issue_category};

/// Repository for issue categories.
#[derive(Clone)]
pub struct IssueCategoryRepository {
    db: Arc<DatabaseConnection>,
}

impl IssueCategoryRepository {
    /// Create a new issue category repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find category by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<issue_category::Model>> {
        IssueCategory::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get category by ID, failing if absent.
    pub async fn get_by_id(&self, id: &str) -> AppResult<issue_category::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category not found: {id}")))
    }

    /// All active categories, ordered by name.
    pub async fn find_active(&self) -> AppResult<Vec<issue_category::Model>> {
        IssueCategory::find()
            .filter(issue_category::Column::IsActive.eq(true))
            .order_by(issue_category::Column::Name, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All categories (for name lookups in analytics).
    pub async fn find_all(&self) -> AppResult<Vec<issue_category::Model>> {
        IssueCategory::find()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<issue_category::Model>::new()])
                .into_connection(),
        );

        let repo = IssueCategoryRepository::new(db);
        let result = repo.get_by_id("ghost").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find_active() {
        let cat = test_utils::category("cat1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[cat]])
                .into_connection(),
        );

        let repo = IssueCategoryRepository::new(db);
        let cats = repo.find_active().await.unwrap();

        assert_eq!(cats.len(), 1);
        assert!(cats[0].is_active);
    }
}
