//! Comment service.

use chrono::Utc;
use hosteldesk_common::{AppResult, IdGenerator};
use hosteldesk_db::{
    entities::{comment, comment::CommentType, user},
    repositories::{CommentRepository, IssueRepository},
};
use sea_orm::Set;

/// Input for adding a comment.
#[derive(Debug, Clone)]
pub struct AddCommentInput {
    pub content: String,
    /// Parent comment for threaded replies. Accepted as given; the parent's
    /// issue is not cross-checked (source behavior).
    pub parent_id: Option<String>,
    pub comment_type: CommentType,
}

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    issue_repo: IssueRepository,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub fn new(comment_repo: CommentRepository, issue_repo: IssueRepository) -> Self {
        Self {
            comment_repo,
            issue_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Add a comment to an issue.
    pub async fn add(
        &self,
        issue_id: &str,
        input: AddCommentInput,
        acting: &user::Model,
    ) -> AppResult<comment::Model> {
        self.issue_repo.get_by_id(issue_id).await?;

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            issue_id: Set(issue_id.to_string()),
            user_id: Set(acting.id.clone()),
            parent_id: Set(input.parent_id),
            content: Set(input.content),
            comment_type: Set(input.comment_type),
            created_at: Set(Utc::now()),
        };

        self.comment_repo.create(model).await
    }

    /// Flat list of comments on an issue, oldest first.
    pub async fn list(&self, issue_id: &str) -> AppResult<Vec<comment::Model>> {
        self.comment_repo.find_by_issue(issue_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use hosteldesk_common::AppError;
    use hosteldesk_db::{entities::issue, test_utils};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_add_comment_missing_issue_fails() {
        let acting = test_utils::student("user1");

        let comment_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let issue_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<issue::Model>::new()])
                .into_connection(),
        );

        let service = CommentService::new(
            CommentRepository::new(comment_db),
            IssueRepository::new(issue_db),
        );

        let input = AddCommentInput {
            content: "Same here".to_string(),
            parent_id: None,
            comment_type: CommentType::Discussion,
        };

        let result = service.add("ghost", input, &acting).await;

        assert!(matches!(result, Err(AppError::IssueNotFound(_))));
    }

    #[tokio::test]
    async fn test_add_reply_keeps_parent_as_given() {
        let acting = test_utils::student("user1");
        let issue = test_utils::issue("i1", "user2");
        let mut reply = test_utils::comment("c2", "i1", "user1");
        reply.parent_id = Some("c1".to_string());

        let comment_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[reply]])
                .into_connection(),
        );
        let issue_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[issue]])
                .into_connection(),
        );

        let service = CommentService::new(
            CommentRepository::new(comment_db),
            IssueRepository::new(issue_db),
        );

        let input = AddCommentInput {
            content: "Same problem in my room".to_string(),
            parent_id: Some("c1".to_string()),
            comment_type: CommentType::Discussion,
        };

        let created = service.add("i1", input, &acting).await.unwrap();

        assert_eq!(created.parent_id.as_deref(), Some("c1"));
    }
}
