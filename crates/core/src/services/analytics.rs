//! Analytics service.
//!
//! Request-time aggregation over the issue table. Nothing here is cached
//! or materialized; every endpoint recomputes from storage and tolerates
//! an empty database by returning zero-filled defaults.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, TimeZone, Utc};
use hosteldesk_common::AppResult;
use hosteldesk_db::{
    entities::issue::{IssueStatus, Priority},
    repositories::{HostelRepository, IssueCategoryRepository, IssueRepository, UserRepository},
};
use serde::Serialize;

/// Per-category count of active issues.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDensity {
    pub category_id: String,
    pub category_name: String,
    pub icon: Option<String>,
    pub count: i64,
}

/// Per-(hostel, block) aggregate for the heatmap.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapCell {
    pub hostel_name: String,
    pub block_name: String,
    pub total: u64,
    /// Issues in the active status set.
    pub open: u64,
    /// HIGH or EMERGENCY issues among the open ones.
    pub high_priority_open: u64,
    /// Average hours from creation to last update across RESOLVED issues
    /// in this bucket; `None` when the bucket has none.
    pub average_resolution_hours: Option<f64>,
}

/// Three-bucket status distribution (admin dashboard).
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDistribution {
    pub resolved: u64,
    pub in_progress: u64,
    /// REPORTED plus ASSIGNED.
    pub open: u64,
}

/// Summary KPIs.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub active_issues: u64,
    pub average_resolution_hours: f64,
    pub resolved_this_month: u64,
    /// STUDENT head-count, used as an occupancy proxy.
    pub occupancy: u64,
}

/// Analytics service for dashboard read models.
#[derive(Clone)]
pub struct AnalyticsService {
    issue_repo: IssueRepository,
    category_repo: IssueCategoryRepository,
    hostel_repo: HostelRepository,
    user_repo: UserRepository,
}

impl AnalyticsService {
    /// Create a new analytics service.
    #[must_use]
    pub const fn new(
        issue_repo: IssueRepository,
        category_repo: IssueCategoryRepository,
        hostel_repo: HostelRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            issue_repo,
            category_repo,
            hostel_repo,
            user_repo,
        }
    }

    /// Active, non-duplicate issue counts per category, highest first.
    pub async fn category_density(
        &self,
        hostel_id: Option<&str>,
        since: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<CategoryDensity>> {
        let counts = self.issue_repo.category_counts(hostel_id, since).await?;
        let categories = self.category_repo.find_all().await?;

        let names: BTreeMap<&str, (&str, Option<&str>)> = categories
            .iter()
            .map(|c| (c.id.as_str(), (c.name.as_str(), c.icon.as_deref())))
            .collect();

        let mut density: Vec<CategoryDensity> = counts
            .into_iter()
            .map(|(category_id, count)| {
                let (name, icon) = names
                    .get(category_id.as_str())
                    .copied()
                    .unwrap_or((category_id.as_str(), None));
                CategoryDensity {
                    category_name: name.to_string(),
                    icon: icon.map(ToString::to_string),
                    category_id,
                    count,
                }
            })
            .collect();

        density.sort_by(|a, b| b.count.cmp(&a.count));

        Ok(density)
    }

    /// Every issue bucketed by (hostel name, block name).
    pub async fn heatmap(&self) -> AppResult<Vec<HeatmapCell>> {
        let issues = self.issue_repo.find_all_for_heatmap().await?;
        let hostels = self.hostel_repo.find_all().await?;
        let blocks = self.hostel_repo.find_all_blocks().await?;

        let hostel_names: BTreeMap<&str, &str> = hostels
            .iter()
            .map(|h| (h.id.as_str(), h.name.as_str()))
            .collect();
        let block_names: BTreeMap<&str, &str> = blocks
            .iter()
            .map(|b| (b.id.as_str(), b.name.as_str()))
            .collect();

        #[derive(Default)]
        struct Bucket {
            total: u64,
            open: u64,
            high_priority_open: u64,
            resolution_hours: Vec<f64>,
        }

        let mut buckets: BTreeMap<(String, String), Bucket> = BTreeMap::new();

        for issue in issues {
            let key = (issue.hostel_id.clone(), issue.block_id.clone());
            let bucket = buckets.entry(key).or_default();

            bucket.total += 1;

            if issue.status.is_active() {
                bucket.open += 1;
                if matches!(issue.priority, Priority::High | Priority::Emergency) {
                    bucket.high_priority_open += 1;
                }
            }

            if issue.status == IssueStatus::Resolved {
                // updated_at predating created_at would yield a negative
                // duration; such rows are skipped.
                let elapsed = issue.updated_at - issue.created_at;
                if elapsed >= chrono::Duration::zero() {
                    bucket
                        .resolution_hours
                        .push(elapsed.num_seconds() as f64 / 3600.0);
                }
            }
        }

        let cells = buckets
            .into_iter()
            .map(|((hostel_id, block_id), bucket)| {
                let average = if bucket.resolution_hours.is_empty() {
                    None
                } else {
                    Some(
                        bucket.resolution_hours.iter().sum::<f64>()
                            / bucket.resolution_hours.len() as f64,
                    )
                };

                HeatmapCell {
                    hostel_name: hostel_names
                        .get(hostel_id.as_str())
                        .copied()
                        .unwrap_or(hostel_id.as_str())
                        .to_string(),
                    block_name: block_names
                        .get(block_id.as_str())
                        .copied()
                        .unwrap_or(block_id.as_str())
                        .to_string(),
                    total: bucket.total,
                    open: bucket.open,
                    high_priority_open: bucket.high_priority_open,
                    average_resolution_hours: average,
                }
            })
            .collect();

        Ok(cells)
    }

    /// RESOLVED / IN_PROGRESS / open counts among non-duplicate issues.
    pub async fn status_distribution(&self) -> AppResult<StatusDistribution> {
        let resolved = self
            .issue_repo
            .count_by_statuses(&[IssueStatus::Resolved], true)
            .await?;
        let in_progress = self
            .issue_repo
            .count_by_statuses(&[IssueStatus::InProgress], true)
            .await?;
        let open = self
            .issue_repo
            .count_by_statuses(&[IssueStatus::Reported, IssueStatus::Assigned], true)
            .await?;

        Ok(StatusDistribution {
            resolved,
            in_progress,
            open,
        })
    }

    /// Summary KPIs; zero-filled on an empty database.
    pub async fn summary(&self) -> AppResult<DashboardSummary> {
        let active_issues = self
            .issue_repo
            .count_by_statuses(&IssueStatus::ACTIVE, false)
            .await?;

        let times = self.issue_repo.find_resolved_times().await?;
        let hours: Vec<f64> = times
            .iter()
            .filter_map(|(created, updated)| {
                let elapsed = *updated - *created;
                (elapsed >= chrono::Duration::zero())
                    .then(|| elapsed.num_seconds() as f64 / 3600.0)
            })
            .collect();
        let average_resolution_hours = if hours.is_empty() {
            0.0
        } else {
            hours.iter().sum::<f64>() / hours.len() as f64
        };

        let now = Utc::now();
        let start_of_month = Utc
            .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
            .single()
            .unwrap_or(now);
        let resolved_this_month = self.issue_repo.count_resolved_since(start_of_month).await?;

        let occupancy = self.user_repo.count_students().await?;

        Ok(DashboardSummary {
            active_issues,
            average_resolution_hours,
            resolved_this_month,
            occupancy,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use hosteldesk_db::{entities::issue, test_utils};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    type MockRow = std::collections::BTreeMap<&'static str, sea_orm::Value>;

    fn count_row(n: i64) -> MockRow {
        maplit::btreemap! { "num_items" => sea_orm::Value::BigInt(Some(n)) }
    }

    fn service(issue_db: MockDatabase, hostel_db: MockDatabase, user_db: MockDatabase) -> AnalyticsService {
        let category_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let hostel_db = Arc::new(hostel_db.into_connection());

        AnalyticsService::new(
            IssueRepository::new(Arc::new(issue_db.into_connection())),
            IssueCategoryRepository::new(category_db),
            HostelRepository::new(hostel_db),
            UserRepository::new(Arc::new(user_db.into_connection())),
        )
    }

    #[tokio::test]
    async fn test_summary_on_empty_database_is_zero_filled() {
        let issue_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![count_row(0)]])
            .append_query_results([Vec::<MockRow>::new()])
            .append_query_results([vec![count_row(0)]]);
        let user_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![count_row(0)]]);

        let service = service(
            issue_db,
            MockDatabase::new(DatabaseBackend::Postgres),
            user_db,
        );

        let summary = service.summary().await.unwrap();

        assert_eq!(summary.active_issues, 0);
        assert_eq!(summary.average_resolution_hours, 0.0);
        assert_eq!(summary.resolved_this_month, 0);
        assert_eq!(summary.occupancy, 0);
    }

    #[tokio::test]
    async fn test_heatmap_buckets_by_location() {
        let reported = test_utils::issue("i1", "user1");

        let mut resolved = test_utils::issue("i2", "user1");
        resolved.status = issue::IssueStatus::Resolved;
        resolved.updated_at = resolved.created_at + chrono::Duration::hours(2);

        let mut emergency = test_utils::issue("i3", "user2");
        emergency.priority = issue::Priority::Emergency;

        let hostel = hosteldesk_db::entities::hostel::Model {
            id: "hostel1".to_string(),
            name: "Hostel A".to_string(),
            created_at: test_utils::fixed_time(),
        };
        let block = hosteldesk_db::entities::block::Model {
            id: "block1".to_string(),
            name: "Block A".to_string(),
            hostel_id: "hostel1".to_string(),
            created_at: test_utils::fixed_time(),
        };

        let issue_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[reported, resolved, emergency]]);
        let hostel_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[hostel]])
            .append_query_results([[block]]);

        let service = service(
            issue_db,
            hostel_db,
            MockDatabase::new(DatabaseBackend::Postgres),
        );

        let cells = service.heatmap().await.unwrap();

        assert_eq!(cells.len(), 1);
        let cell = &cells[0];
        assert_eq!(cell.hostel_name, "Hostel A");
        assert_eq!(cell.block_name, "Block A");
        assert_eq!(cell.total, 3);
        assert_eq!(cell.open, 2);
        assert_eq!(cell.high_priority_open, 1);
        assert_eq!(cell.average_resolution_hours, Some(2.0));
    }

    #[tokio::test]
    async fn test_heatmap_empty_database() {
        let issue_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<issue::Model>::new()]);
        let hostel_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<hosteldesk_db::entities::hostel::Model>::new()])
            .append_query_results([Vec::<hosteldesk_db::entities::block::Model>::new()]);

        let service = service(
            issue_db,
            hostel_db,
            MockDatabase::new(DatabaseBackend::Postgres),
        );

        let cells = service.heatmap().await.unwrap();

        assert!(cells.is_empty());
    }

    #[tokio::test]
    async fn test_status_distribution_counts_three_buckets() {
        let issue_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![count_row(5)]])
            .append_query_results([vec![count_row(2)]])
            .append_query_results([vec![count_row(7)]]);

        let service = service(
            issue_db,
            MockDatabase::new(DatabaseBackend::Postgres),
            MockDatabase::new(DatabaseBackend::Postgres),
        );

        let distribution = service.status_distribution().await.unwrap();

        assert_eq!(distribution.resolved, 5);
        assert_eq!(distribution.in_progress, 2);
        assert_eq!(distribution.open, 7);
    }
}
