//! Upvote repository.

use std::sync::Arc;

use hosteldesk_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
};

use crate::entities::{Upvote, upvote};

/// Repository for upvote operations.
#[derive(Clone)]
pub struct UpvoteRepository {
    db: Arc<DatabaseConnection>,
}

impl UpvoteRepository {
    /// Create a new upvote repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the upvote by a user on an issue, if any.
    pub async fn find_by_issue_and_user(
        &self,
        issue_id: &str,
        user_id: &str,
    ) -> AppResult<Option<upvote::Model>> {
        Upvote::find()
            .filter(upvote::Column::IssueId.eq(issue_id))
            .filter(upvote::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert an upvote. A concurrent duplicate fails on the unique index.
    pub async fn create(&self, model: upvote::ActiveModel) -> AppResult<upvote::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an upvote by ID.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Upvote::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Count upvotes on an issue.
    pub async fn count_by_issue(&self, issue_id: &str) -> AppResult<u64> {
        Upvote::find()
            .filter(upvote::Column::IssueId.eq(issue_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn test_find_by_issue_and_user_present() {
        let upvote = test_utils::upvote("uv1", "i1", "user1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[upvote]])
                .into_connection(),
        );

        let repo = UpvoteRepository::new(db);
        let found = repo.find_by_issue_and_user("i1", "user1").await.unwrap();

        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_find_by_issue_and_user_absent() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<upvote::Model>::new()])
                .into_connection(),
        );

        let repo = UpvoteRepository::new(db);
        let found = repo.find_by_issue_and_user("i1", "user1").await.unwrap();

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_delete_succeeds() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = UpvoteRepository::new(db);
        assert!(repo.delete("uv1").await.is_ok());
    }

    #[tokio::test]
    async fn test_count_by_issue() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(3))
                }]])
                .into_connection(),
        );

        let repo = UpvoteRepository::new(db);
        let count = repo.count_by_issue("i1").await.unwrap();

        assert_eq!(count, 3);
    }
}
