//! Issue repository.
//!
//! Lifecycle writes and the read-side queries behind the issue list and the
//! analytics dashboards. Only resolve and close are transactional (each
//! pairs the status write with its history insert); every other write is a
//! single statement, matching the source system's storage semantics.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use hosteldesk_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
    sea_query::Expr,
};

use crate::entities::{
    Issue, IssueStatusHistory, issue,
    issue::{IssueStatus, Priority},
    issue_status_history,
};

/// Sort order for issue listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IssueSort {
    /// Newest first.
    #[default]
    Newest,
    /// Oldest first.
    Oldest,
    /// Emergency first, then by recency.
    Priority,
}

/// Who the listing is computed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisibilityScope {
    /// Staff/admin: everything.
    All,
    /// Anonymous: public issues only.
    PublicOnly,
    /// Students: public issues plus their own private ones.
    PublicOrReporter(String),
}

/// Filters for the issue listing.
#[derive(Debug, Clone, Default)]
pub struct IssueFilter {
    pub hostel_id: Option<String>,
    pub block_id: Option<String>,
    pub status: Option<IssueStatus>,
    pub priority: Option<Priority>,
    /// Substring match against title or description.
    pub search: Option<String>,
    /// Restrict to the active status set.
    pub unresolved_only: bool,
    pub sort: IssueSort,
    /// 1-based page number.
    pub page: u64,
    pub limit: u64,
}

/// Repository for issue operations.
#[derive(Clone)]
pub struct IssueRepository {
    db: Arc<DatabaseConnection>,
}

impl IssueRepository {
    /// Create a new issue repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find issue by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<issue::Model>> {
        Issue::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get issue by ID, failing if absent.
    pub async fn get_by_id(&self, id: &str) -> AppResult<issue::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::IssueNotFound(id.to_string()))
    }

    /// Insert a new issue.
    pub async fn create(&self, model: issue::ActiveModel) -> AppResult<issue::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List issues with filters, visibility scoping and pagination.
    ///
    /// Returns the page of issues and the total match count.
    pub async fn list(
        &self,
        filter: &IssueFilter,
        scope: &VisibilityScope,
    ) -> AppResult<(Vec<issue::Model>, u64)> {
        let mut cond = Condition::all();

        if let Some(hostel_id) = &filter.hostel_id {
            cond = cond.add(issue::Column::HostelId.eq(hostel_id));
        }
        if let Some(block_id) = &filter.block_id {
            cond = cond.add(issue::Column::BlockId.eq(block_id));
        }
        if let Some(status) = filter.status {
            cond = cond.add(issue::Column::Status.eq(status));
        }
        if let Some(priority) = filter.priority {
            cond = cond.add(issue::Column::Priority.eq(priority));
        }
        if filter.unresolved_only {
            cond = cond.add(issue::Column::Status.is_in(IssueStatus::ACTIVE));
        }
        if let Some(search) = &filter.search {
            cond = cond.add(
                Condition::any()
                    .add(issue::Column::Title.contains(search))
                    .add(issue::Column::Description.contains(search)),
            );
        }

        cond = match scope {
            VisibilityScope::All => cond,
            VisibilityScope::PublicOnly => {
                cond.add(issue::Column::Visibility.eq(issue::Visibility::Public))
            }
            VisibilityScope::PublicOrReporter(user_id) => cond.add(
                Condition::any()
                    .add(issue::Column::Visibility.eq(issue::Visibility::Public))
                    .add(issue::Column::ReporterId.eq(user_id)),
            ),
        };

        let total = Issue::find()
            .filter(cond.clone())
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut query = Issue::find().filter(cond);

        query = match filter.sort {
            IssueSort::Newest => query.order_by(issue::Column::CreatedAt, Order::Desc),
            IssueSort::Oldest => query.order_by(issue::Column::CreatedAt, Order::Asc),
            IssueSort::Priority => query
                .order_by(
                    Expr::cust(
                        "CASE \"issue\".\"priority\" \
                         WHEN 'EMERGENCY' THEN 0 \
                         WHEN 'HIGH' THEN 1 \
                         WHEN 'MEDIUM' THEN 2 \
                         ELSE 3 END",
                    ),
                    Order::Asc,
                )
                .order_by(issue::Column::CreatedAt, Order::Desc),
        };

        let page = filter.page.max(1);
        let limit = filter.limit.max(1);

        let issues = query
            .offset((page - 1) * limit)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((issues, total))
    }

    /// Claim an issue for a staff member.
    ///
    /// Last write wins: there is no check that the issue is still
    /// unassigned, and no history row is written (source behavior).
    pub async fn claim(&self, issue_id: &str, staff_id: &str) -> AppResult<issue::Model> {
        let issue = self.get_by_id(issue_id).await?;
        let now = Utc::now();

        let mut active: issue::ActiveModel = issue.into();
        active.status = Set(IssueStatus::Assigned);
        active.assignee_id = Set(Some(staff_id.to_string()));
        active.assigned_at = Set(Some(now));
        active.updated_at = Set(now);

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Move an issue to IN_PROGRESS. No current-status check, no history row.
    pub async fn start_progress(&self, issue_id: &str) -> AppResult<issue::Model> {
        let issue = self.get_by_id(issue_id).await?;

        let mut active: issue::ActiveModel = issue.into();
        active.status = Set(IssueStatus::InProgress);
        active.updated_at = Set(Utc::now());

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Resolve an issue and record the transition, atomically.
    ///
    /// The status update and the history insert commit together or not at
    /// all.
    pub async fn resolve_with_history(
        &self,
        issue_id: &str,
        history_id: String,
        staff_id: &str,
        note: String,
    ) -> AppResult<issue::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let issue = Issue::find_by_id(issue_id)
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::IssueNotFound(issue_id.to_string()))?;

        let from_status = issue.status;
        let now = Utc::now();

        let mut active: issue::ActiveModel = issue.into();
        active.status = Set(IssueStatus::Resolved);
        active.resolved_at = Set(Some(now));
        active.updated_at = Set(now);

        let updated = active
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let history = issue_status_history::ActiveModel {
            id: Set(history_id),
            issue_id: Set(issue_id.to_string()),
            from_status: Set(from_status),
            to_status: Set(IssueStatus::Resolved),
            changed_by_id: Set(staff_id.to_string()),
            note: Set(Some(note)),
            created_at: Set(now),
        };

        history
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(updated)
    }

    /// Close an issue and record the transition, atomically.
    ///
    /// `from_status` in the history row is the pre-image status read inside
    /// the transaction. Reporter-only authorization is the caller's job.
    pub async fn close_with_history(
        &self,
        issue_id: &str,
        history_id: String,
        user_id: &str,
    ) -> AppResult<issue::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let issue = Issue::find_by_id(issue_id)
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::IssueNotFound(issue_id.to_string()))?;

        let from_status = issue.status;
        let now = Utc::now();

        let mut active: issue::ActiveModel = issue.into();
        active.status = Set(IssueStatus::Closed);
        active.closed_at = Set(Some(now));
        active.updated_at = Set(now);

        let updated = active
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let history = issue_status_history::ActiveModel {
            id: Set(history_id),
            issue_id: Set(issue_id.to_string()),
            from_status: Set(from_status),
            to_status: Set(IssueStatus::Closed),
            changed_by_id: Set(user_id.to_string()),
            note: Set(None),
            created_at: Set(now),
        };

        history
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(updated)
    }

    /// Status history for an issue, oldest first.
    pub async fn find_history(
        &self,
        issue_id: &str,
    ) -> AppResult<Vec<issue_status_history::Model>> {
        IssueStatusHistory::find()
            .filter(issue_status_history::Column::IssueId.eq(issue_id))
            .order_by(issue_status_history::Column::CreatedAt, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ==================== Analytics queries ====================

    /// Count issues in the given status set, optionally excluding duplicates.
    pub async fn count_by_statuses(
        &self,
        statuses: &[IssueStatus],
        exclude_duplicates: bool,
    ) -> AppResult<u64> {
        let mut query = Issue::find().filter(issue::Column::Status.is_in(statuses.iter().copied()));

        if exclude_duplicates {
            query = query.filter(issue::Column::IsDuplicate.eq(false));
        }

        query
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Per-category counts of active, non-duplicate issues.
    ///
    /// Unordered; the caller sorts by count.
    pub async fn category_counts(
        &self,
        hostel_id: Option<&str>,
        since: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<(String, i64)>> {
        let mut query = Issue::find()
            .select_only()
            .column(issue::Column::CategoryId)
            .column_as(issue::Column::Id.count(), "count")
            .filter(issue::Column::IsDuplicate.eq(false))
            .filter(issue::Column::Status.is_in(IssueStatus::ACTIVE));

        if let Some(hostel_id) = hostel_id {
            query = query.filter(issue::Column::HostelId.eq(hostel_id));
        }
        if let Some(since) = since {
            query = query.filter(issue::Column::CreatedAt.gte(since));
        }

        query
            .group_by(issue::Column::CategoryId)
            .into_tuple::<(String, i64)>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Every issue, for request-time heatmap bucketing.
    pub async fn find_all_for_heatmap(&self) -> AppResult<Vec<issue::Model>> {
        Issue::find()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// (created_at, updated_at) pairs of all RESOLVED issues.
    pub async fn find_resolved_times(&self) -> AppResult<Vec<(DateTime<Utc>, DateTime<Utc>)>> {
        Issue::find()
            .select_only()
            .column(issue::Column::CreatedAt)
            .column(issue::Column::UpdatedAt)
            .filter(issue::Column::Status.eq(IssueStatus::Resolved))
            .into_tuple::<(DateTime<Utc>, DateTime<Utc>)>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count issues resolved at or after the given instant.
    pub async fn count_resolved_since(&self, since: DateTime<Utc>) -> AppResult<u64> {
        Issue::find()
            .filter(issue::Column::Status.eq(IssueStatus::Resolved))
            .filter(issue::Column::ResolvedAt.gte(since))
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
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<issue::Model>::new()])
                .into_connection(),
        );

        let repo = IssueRepository::new(db);
        let result = repo.get_by_id("ghost").await;

        match result {
            Err(AppError::IssueNotFound(id)) => assert_eq!(id, "ghost"),
            _ => panic!("Expected IssueNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_list_returns_page_and_total() {
        let i1 = test_utils::issue("i1", "user1");
        let i2 = test_utils::issue("i2", "user1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // count query, then page query
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(2))
                }]])
                .append_query_results([[i1, i2]])
                .into_connection(),
        );

        let repo = IssueRepository::new(db);
        let filter = IssueFilter {
            hostel_id: Some("hostel1".to_string()),
            unresolved_only: true,
            page: 1,
            limit: 20,
            ..Default::default()
        };

        let (issues, total) = repo.list(&filter, &VisibilityScope::All).await.unwrap();

        assert_eq!(total, 2);
        assert_eq!(issues.len(), 2);
    }

    #[tokio::test]
    async fn test_claim_sets_assignee_and_status() {
        let issue = test_utils::issue("i1", "user1");
        let mut claimed = issue.clone();
        claimed.status = IssueStatus::Assigned;
        claimed.assignee_id = Some("staff1".to_string());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[issue]])
                .append_query_results([[claimed]])
                .into_connection(),
        );

        let repo = IssueRepository::new(db);
        let updated = repo.claim("i1", "staff1").await.unwrap();

        assert_eq!(updated.status, IssueStatus::Assigned);
        assert_eq!(updated.assignee_id.as_deref(), Some("staff1"));
    }

    #[tokio::test]
    async fn test_claim_missing_issue_fails() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<issue::Model>::new()])
                .into_connection(),
        );

        let repo = IssueRepository::new(db);
        let result = repo.claim("ghost", "staff1").await;

        assert!(matches!(result, Err(AppError::IssueNotFound(_))));
    }

    #[tokio::test]
    async fn test_resolve_with_history_commits_pair() {
        let issue = test_utils::issue("i1", "user1");
        let mut resolved = issue.clone();
        resolved.status = IssueStatus::Resolved;

        let history = crate::entities::issue_status_history::Model {
            id: "h1".to_string(),
            issue_id: "i1".to_string(),
            from_status: IssueStatus::Reported,
            to_status: IssueStatus::Resolved,
            changed_by_id: "staff1".to_string(),
            note: Some("Replaced the bulb".to_string()),
            created_at: test_utils::fixed_time(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[issue]])
                .append_query_results([[resolved]])
                .append_query_results([[history]])
                .into_connection(),
        );

        let repo = IssueRepository::new(db);
        let updated = repo
            .resolve_with_history("i1", "h1".to_string(), "staff1", "Replaced the bulb".to_string())
            .await
            .unwrap();

        assert_eq!(updated.status, IssueStatus::Resolved);
    }

    #[tokio::test]
    async fn test_resolve_aborts_when_history_insert_fails() {
        let issue = test_utils::issue("i1", "user1");
        let mut resolved = issue.clone();
        resolved.status = IssueStatus::Resolved;

        // The issue update succeeds, the history insert returns nothing:
        // the whole operation must surface an error (and roll back).
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[issue]])
                .append_query_results([[resolved]])
                .append_query_results([Vec::<crate::entities::issue_status_history::Model>::new()])
                .into_connection(),
        );

        let repo = IssueRepository::new(db);
        let result = repo
            .resolve_with_history("i1", "h1".to_string(), "staff1", "note".to_string())
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_close_records_pre_image_status() {
        let mut issue = test_utils::issue("i1", "user1");
        issue.status = IssueStatus::Resolved;
        let mut closed = issue.clone();
        closed.status = IssueStatus::Closed;

        let history = crate::entities::issue_status_history::Model {
            id: "h1".to_string(),
            issue_id: "i1".to_string(),
            from_status: IssueStatus::Resolved,
            to_status: IssueStatus::Closed,
            changed_by_id: "user1".to_string(),
            note: None,
            created_at: test_utils::fixed_time(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[issue]])
                .append_query_results([[closed]])
                .append_query_results([[history]])
                .into_connection(),
        );

        let repo = IssueRepository::new(db);
        let updated = repo
            .close_with_history("i1", "h1".to_string(), "user1")
            .await
            .unwrap();

        assert_eq!(updated.status, IssueStatus::Closed);
    }

    #[tokio::test]
    async fn test_category_counts_empty() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<
                    std::collections::BTreeMap<&'static str, sea_orm::Value>,
                >::new()])
                .into_connection(),
        );

        let repo = IssueRepository::new(db);
        let counts = repo.category_counts(None, None).await.unwrap();

        assert!(counts.is_empty());
    }
}
