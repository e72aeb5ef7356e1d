//! Upvote service.

use chrono::Utc;
use hosteldesk_common::{AppResult, IdGenerator};
use hosteldesk_db::{
    entities::{upvote, user},
    repositories::{IssueRepository, UpvoteRepository},
};
use sea_orm::Set;

/// Result of an upvote toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpvoteToggle {
    /// Whether the user has an upvote on the issue after the toggle.
    pub upvoted: bool,
    /// Upvote count on the issue after the toggle.
    pub count: u64,
}

/// Upvote service for business logic.
#[derive(Clone)]
pub struct UpvoteService {
    upvote_repo: UpvoteRepository,
    issue_repo: IssueRepository,
    id_gen: IdGenerator,
}

impl UpvoteService {
    /// Create a new upvote service.
    #[must_use]
    pub fn new(upvote_repo: UpvoteRepository, issue_repo: IssueRepository) -> Self {
        Self {
            upvote_repo,
            issue_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Toggle the acting user's upvote on an issue.
    ///
    /// Deletes the (issue, user) row if present, inserts it otherwise.
    /// Alternating calls return to the original state. Concurrent double
    /// inserts fail on the database's unique index; there is no other race
    /// protection.
    pub async fn toggle(&self, issue_id: &str, acting: &user::Model) -> AppResult<UpvoteToggle> {
        self.issue_repo.get_by_id(issue_id).await?;

        let existing = self
            .upvote_repo
            .find_by_issue_and_user(issue_id, &acting.id)
            .await?;

        let upvoted = match existing {
            Some(upvote) => {
                self.upvote_repo.delete(&upvote.id).await?;
                false
            }
            None => {
                let model = upvote::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    issue_id: Set(issue_id.to_string()),
                    user_id: Set(acting.id.clone()),
                    created_at: Set(Utc::now()),
                };
                self.upvote_repo.create(model).await?;
                true
            }
        };

        let count = self.upvote_repo.count_by_issue(issue_id).await?;

        Ok(UpvoteToggle { upvoted, count })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use hosteldesk_common::AppError;
    use hosteldesk_db::{entities::issue, test_utils};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_toggle_on_inserts_upvote() {
        let acting = test_utils::student("user1");
        let issue = test_utils::issue("i1", "user2");
        let created = test_utils::upvote("uv1", "i1", "user1");

        let upvote_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // no existing upvote
                .append_query_results([Vec::<upvote::Model>::new()])
                // insert returning
                .append_query_results([[created]])
                // count after toggle
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(1))
                }]])
                .into_connection(),
        );
        let issue_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[issue]])
                .into_connection(),
        );

        let service = UpvoteService::new(
            UpvoteRepository::new(upvote_db),
            IssueRepository::new(issue_db),
        );

        let result = service.toggle("i1", &acting).await.unwrap();

        assert!(result.upvoted);
        assert_eq!(result.count, 1);
    }

    #[tokio::test]
    async fn test_toggle_off_deletes_upvote() {
        let acting = test_utils::student("user1");
        let issue = test_utils::issue("i1", "user2");
        let existing = test_utils::upvote("uv1", "i1", "user1");

        let upvote_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(0))
                }]])
                .into_connection(),
        );
        let issue_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[issue]])
                .into_connection(),
        );

        let service = UpvoteService::new(
            UpvoteRepository::new(upvote_db),
            IssueRepository::new(issue_db),
        );

        let result = service.toggle("i1", &acting).await.unwrap();

        assert!(!result.upvoted);
        assert_eq!(result.count, 0);
    }

    #[tokio::test]
    async fn test_toggle_missing_issue_fails() {
        let acting = test_utils::student("user1");

        let upvote_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let issue_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<issue::Model>::new()])
                .into_connection(),
        );

        let service = UpvoteService::new(
            UpvoteRepository::new(upvote_db),
            IssueRepository::new(issue_db),
        );

        let result = service.toggle("ghost", &acting).await;

        assert!(matches!(result, Err(AppError::IssueNotFound(_))));
    }
}
