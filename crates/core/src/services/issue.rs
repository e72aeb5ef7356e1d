//! Issue lifecycle service.
//!
//! REPORTED → ASSIGNED → IN_PROGRESS → RESOLVED → CLOSED. Claim and
//! start-progress are plain writes; resolve and close pair the status write
//! with a history insert in one transaction. Claim does not check that the
//! issue is still unassigned and writes no history row (source behavior).

use chrono::Utc;
use hosteldesk_common::{AppError, AppResult, IdGenerator};
use hosteldesk_db::{
    entities::{
        issue,
        issue::{IssueStatus, Priority, Visibility},
        issue_status_history, user,
    },
    repositories::{
        CommentRepository, IssueCategoryRepository, IssueFilter, IssueRepository,
        UpvoteRepository, VisibilityScope,
    },
};
use sea_orm::Set;

/// Room id recorded when the reporter's profile has no room assignment.
const ROOM_PLACEHOLDER: &str = "unassigned";

/// Default history note when staff resolve without one.
const DEFAULT_RESOLVE_NOTE: &str = "Resolved by staff";

/// Input for creating an issue.
#[derive(Debug, Clone)]
pub struct CreateIssueInput {
    pub title: String,
    pub description: String,
    pub category_id: String,
    pub priority: Priority,
    pub visibility: Visibility,
    pub media_url: Option<String>,
    pub image_urls: Vec<String>,
    /// Staff-only explicit location, overriding the profile lookup.
    pub location_override: Option<LocationOverride>,
}

/// Explicit location selection for staff-authored issues.
#[derive(Debug, Clone)]
pub struct LocationOverride {
    pub hostel_id: String,
    pub block_id: String,
    pub room_id: Option<String>,
}

/// A single issue with its relations, for the detail view.
#[derive(Debug, Clone)]
pub struct IssueDetail {
    pub issue: issue::Model,
    pub comments: Vec<hosteldesk_db::entities::comment::Model>,
    pub history: Vec<issue_status_history::Model>,
    pub upvote_count: u64,
}

/// Issue service for business logic.
#[derive(Clone)]
pub struct IssueService {
    issue_repo: IssueRepository,
    category_repo: IssueCategoryRepository,
    comment_repo: CommentRepository,
    upvote_repo: UpvoteRepository,
    id_gen: IdGenerator,
}

impl IssueService {
    /// Create a new issue service.
    #[must_use]
    pub fn new(
        issue_repo: IssueRepository,
        category_repo: IssueCategoryRepository,
        comment_repo: CommentRepository,
        upvote_repo: UpvoteRepository,
    ) -> Self {
        Self {
            issue_repo,
            category_repo,
            comment_repo,
            upvote_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new issue with status REPORTED.
    ///
    /// The location is denormalized from the acting user's profile; a staff
    /// member may supply an explicit override instead. Fails `Validation`
    /// when the profile lacks a hostel or block (any role); the room falls
    /// back to a placeholder when absent.
    pub async fn create(
        &self,
        input: CreateIssueInput,
        acting: &user::Model,
    ) -> AppResult<issue::Model> {
        self.category_repo.get_by_id(&input.category_id).await?;

        let (hostel_id, block_id, room_id) = match (acting.is_staff(), input.location_override) {
            (true, Some(location)) => (
                location.hostel_id,
                location.block_id,
                location
                    .room_id
                    .unwrap_or_else(|| ROOM_PLACEHOLDER.to_string()),
            ),
            _ => {
                let hostel_id = acting.hostel_id.clone().ok_or_else(|| {
                    AppError::Validation(
                        "Profile incomplete: hostel must be set before reporting".to_string(),
                    )
                })?;
                let block_id = acting.block_id.clone().ok_or_else(|| {
                    AppError::Validation(
                        "Profile incomplete: block must be set before reporting".to_string(),
                    )
                })?;
                let room_id = acting
                    .room_id
                    .clone()
                    .unwrap_or_else(|| ROOM_PLACEHOLDER.to_string());

                (hostel_id, block_id, room_id)
            }
        };

        let now = Utc::now();
        let model = issue::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(input.title),
            description: Set(input.description),
            priority: Set(input.priority),
            status: Set(IssueStatus::Reported),
            visibility: Set(input.visibility),
            category_id: Set(input.category_id),
            reporter_id: Set(acting.id.clone()),
            assignee_id: Set(None),
            hostel_id: Set(hostel_id),
            block_id: Set(block_id),
            room_id: Set(room_id),
            media_url: Set(input.media_url),
            image_urls: Set(serde_json::json!(input.image_urls)),
            is_duplicate: Set(false),
            merged_with: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            assigned_at: Set(None),
            resolved_at: Set(None),
            closed_at: Set(None),
        };

        let created = self.issue_repo.create(model).await?;
        tracing::info!(issue_id = %created.id, reporter_id = %acting.id, "Issue reported");

        Ok(created)
    }

    /// List issues scoped to what the viewer may see.
    pub async fn list(
        &self,
        filter: &IssueFilter,
        viewer: Option<&user::Model>,
    ) -> AppResult<(Vec<issue::Model>, u64)> {
        let scope = match viewer {
            None => VisibilityScope::PublicOnly,
            Some(user) if user.is_staff() || user.is_admin() => VisibilityScope::All,
            Some(user) => VisibilityScope::PublicOrReporter(user.id.clone()),
        };

        self.issue_repo.list(filter, &scope).await
    }

    /// A single issue with comments, history and upvote count.
    ///
    /// Private issues are visible to the reporter, staff and admins only.
    pub async fn detail(&self, issue_id: &str, viewer: &user::Model) -> AppResult<IssueDetail> {
        let issue = self.issue_repo.get_by_id(issue_id).await?;

        if issue.visibility == Visibility::Private
            && issue.reporter_id != viewer.id
            && !viewer.is_staff()
            && !viewer.is_admin()
        {
            return Err(AppError::Forbidden("This issue is private".to_string()));
        }

        let comments = self.comment_repo.find_by_issue(issue_id).await?;
        let history = self.issue_repo.find_history(issue_id).await?;
        let upvote_count = self.upvote_repo.count_by_issue(issue_id).await?;

        Ok(IssueDetail {
            issue,
            comments,
            history,
            upvote_count,
        })
    }

    /// Claim an issue (staff only). Last write wins; no history row.
    pub async fn claim(&self, issue_id: &str, acting: &user::Model) -> AppResult<issue::Model> {
        if !acting.is_staff() {
            return Err(AppError::Forbidden(
                "Only staff can claim issues".to_string(),
            ));
        }

        let claimed = self.issue_repo.claim(issue_id, &acting.id).await?;
        tracing::info!(issue_id = %issue_id, staff_id = %acting.id, "Issue claimed");

        Ok(claimed)
    }

    /// Move an issue to IN_PROGRESS (staff only).
    pub async fn start_progress(
        &self,
        issue_id: &str,
        acting: &user::Model,
    ) -> AppResult<issue::Model> {
        if !acting.is_staff() {
            return Err(AppError::Forbidden(
                "Only staff can start work on issues".to_string(),
            ));
        }

        self.issue_repo.start_progress(issue_id).await
    }

    /// Resolve an issue (staff only), recording the transition atomically.
    pub async fn resolve(
        &self,
        issue_id: &str,
        note: Option<String>,
        acting: &user::Model,
    ) -> AppResult<issue::Model> {
        if !acting.is_staff() {
            return Err(AppError::Forbidden(
                "Only staff can resolve issues".to_string(),
            ));
        }

        let note = note.unwrap_or_else(|| DEFAULT_RESOLVE_NOTE.to_string());
        let resolved = self
            .issue_repo
            .resolve_with_history(issue_id, self.id_gen.generate(), &acting.id, note)
            .await?;

        tracing::info!(issue_id = %issue_id, staff_id = %acting.id, "Issue resolved");

        Ok(resolved)
    }

    /// Close an issue. Only the original reporter may close.
    pub async fn close(&self, issue_id: &str, acting: &user::Model) -> AppResult<issue::Model> {
        let issue = self.issue_repo.get_by_id(issue_id).await?;

        if issue.reporter_id != acting.id {
            return Err(AppError::Forbidden(
                "Only the reporter can close this issue".to_string(),
            ));
        }

        let closed = self
            .issue_repo
            .close_with_history(issue_id, self.id_gen.generate(), &acting.id)
            .await?;

        tracing::info!(issue_id = %issue_id, user_id = %acting.id, "Issue closed");

        Ok(closed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use hosteldesk_db::test_utils;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn empty_service(issue_db: MockDatabase, category_db: MockDatabase) -> IssueService {
        let issue_db = Arc::new(issue_db.into_connection());
        let other = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        IssueService::new(
            IssueRepository::new(issue_db),
            IssueCategoryRepository::new(Arc::new(category_db.into_connection())),
            CommentRepository::new(Arc::clone(&other)),
            UpvoteRepository::new(other),
        )
    }

    fn create_input() -> CreateIssueInput {
        CreateIssueInput {
            title: "Broken light".to_string(),
            description: "The corridor light is flickering".to_string(),
            category_id: "cat1".to_string(),
            priority: Priority::High,
            visibility: Visibility::Public,
            media_url: None,
            image_urls: vec![],
            location_override: None,
        }
    }

    #[tokio::test]
    async fn test_create_copies_reporter_location() {
        let reporter = test_utils::student("user1");
        let mut expected = test_utils::issue("i1", "user1");
        expected.priority = Priority::High;

        let issue_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[expected]]);
        let category_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_utils::category("cat1")]]);

        let service = empty_service(issue_db, category_db);
        let created = service.create(create_input(), &reporter).await.unwrap();

        assert_eq!(created.hostel_id, "hostel1");
        assert_eq!(created.block_id, "block1");
        assert_eq!(created.status, IssueStatus::Reported);
    }

    #[tokio::test]
    async fn test_create_fails_without_hostel() {
        let mut reporter = test_utils::student("user1");
        reporter.hostel_id = None;

        let issue_db = MockDatabase::new(DatabaseBackend::Postgres);
        let category_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_utils::category("cat1")]]);

        let service = empty_service(issue_db, category_db);
        let result = service.create(create_input(), &reporter).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_fails_without_block_even_for_staff_without_override() {
        let mut staff = test_utils::staff("staff1", user::Specialization::Electrician);
        staff.hostel_id = Some("hostel1".to_string());
        staff.block_id = None;

        let issue_db = MockDatabase::new(DatabaseBackend::Postgres);
        let category_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_utils::category("cat1")]]);

        let service = empty_service(issue_db, category_db);
        let result = service.create(create_input(), &staff).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_staff_override_skips_profile() {
        let staff = test_utils::staff("staff1", user::Specialization::Electrician);
        let mut expected = test_utils::issue("i1", "staff1");
        expected.hostel_id = "hostel2".to_string();
        expected.block_id = "block9".to_string();
        expected.room_id = ROOM_PLACEHOLDER.to_string();

        let issue_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[expected]]);
        let category_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_utils::category("cat1")]]);

        let service = empty_service(issue_db, category_db);

        let mut input = create_input();
        input.location_override = Some(LocationOverride {
            hostel_id: "hostel2".to_string(),
            block_id: "block9".to_string(),
            room_id: None,
        });

        let created = service.create(input, &staff).await.unwrap();

        assert_eq!(created.hostel_id, "hostel2");
        assert_eq!(created.room_id, ROOM_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_create_unknown_category_fails() {
        let reporter = test_utils::student("user1");

        let issue_db = MockDatabase::new(DatabaseBackend::Postgres);
        let category_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<hosteldesk_db::entities::issue_category::Model>::new()]);

        let service = empty_service(issue_db, category_db);
        let result = service.create(create_input(), &reporter).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_claim_requires_staff() {
        let student = test_utils::student("user1");

        let service = empty_service(
            MockDatabase::new(DatabaseBackend::Postgres),
            MockDatabase::new(DatabaseBackend::Postgres),
        );

        let result = service.claim("i1", &student).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_resolve_requires_staff() {
        let admin = test_utils::admin("admin1");

        let service = empty_service(
            MockDatabase::new(DatabaseBackend::Postgres),
            MockDatabase::new(DatabaseBackend::Postgres),
        );

        // Admins are not staff; resolve is a staff action.
        let result = service.resolve("i1", None, &admin).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_close_by_non_reporter_fails() {
        let issue = test_utils::issue("i1", "user1");

        for other in [
            test_utils::student("user2"),
            test_utils::staff("staff1", user::Specialization::Plumber),
            test_utils::admin("admin1"),
        ] {
            let issue_db = MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[issue.clone()]]);
            let service =
                empty_service(issue_db, MockDatabase::new(DatabaseBackend::Postgres));

            let result = service.close("i1", &other).await;
            assert!(matches!(result, Err(AppError::Forbidden(_))));
        }
    }

    #[tokio::test]
    async fn test_close_missing_issue_fails() {
        let acting = test_utils::student("user1");

        let issue_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<issue::Model>::new()]);
        let service = empty_service(issue_db, MockDatabase::new(DatabaseBackend::Postgres));

        let result = service.close("ghost", &acting).await;

        assert!(matches!(result, Err(AppError::IssueNotFound(_))));
    }

    #[tokio::test]
    async fn test_detail_private_issue_hidden_from_others() {
        let mut issue = test_utils::issue("i1", "user1");
        issue.visibility = Visibility::Private;
        let other = test_utils::student("user2");

        let issue_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[issue]]);
        let service = empty_service(issue_db, MockDatabase::new(DatabaseBackend::Postgres));

        let result = service.detail("i1", &other).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
