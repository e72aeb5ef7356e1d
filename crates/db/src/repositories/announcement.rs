//! Announcement repository.

use std::sync::Arc;

use chrono::Utc;
use hosteldesk_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order, QueryFilter,
    QueryOrder,
};

use crate::entities::{Announcement, announcement};

/// Repository for announcement operations.
#[derive(Clone)]
pub struct AnnouncementRepository {
    db: Arc<DatabaseConnection>,
}

impl AnnouncementRepository {
    /// Create a new announcement repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find announcement by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<announcement::Model>> {
        Announcement::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a new announcement.
    pub async fn create(&self, model: announcement::ActiveModel) -> AppResult<announcement::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Announcements visible to a viewer in the given hostel.
    ///
    /// Global announcements (no target hostel) plus those targeting the
    /// viewer's hostel, excluding expired ones. Pinned first, then newest.
    pub async fn find_visible(
        &self,
        hostel_id: Option<&str>,
    ) -> AppResult<Vec<announcement::Model>> {
        let now = Utc::now();

        let mut target = Condition::any().add(announcement::Column::TargetHostelId.is_null());
        if let Some(hostel_id) = hostel_id {
            target = target.add(announcement::Column::TargetHostelId.eq(hostel_id));
        }

        Announcement::find()
            .filter(target)
            .filter(
                Condition::any()
                    .add(announcement::Column::ExpiresAt.is_null())
                    .add(announcement::Column::ExpiresAt.gte(now)),
            )
            .order_by(announcement::Column::IsPinned, Order::Desc)
            .order_by(announcement::Column::CreatedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::issue::Priority;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_announcement(id: &str, target_hostel_id: Option<&str>) -> announcement::Model {
        announcement::Model {
            id: id.to_string(),
            title: "Water outage".to_string(),
            content: "Maintenance on Saturday morning".to_string(),
            priority: Priority::High,
            is_pinned: false,
            author_id: "admin1".to_string(),
            target_hostel_id: target_hostel_id.map(ToString::to_string),
            target_block_id: None,
            expires_at: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_find_visible_returns_global_and_targeted() {
        let global = create_test_announcement("a1", None);
        let targeted = create_test_announcement("a2", Some("hostel1"));

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[global, targeted]])
                .into_connection(),
        );

        let repo = AnnouncementRepository::new(db);
        let announcements = repo.find_visible(Some("hostel1")).await.unwrap();

        assert_eq!(announcements.len(), 2);
    }

    #[tokio::test]
    async fn test_find_visible_empty() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<announcement::Model>::new()])
                .into_connection(),
        );

        let repo = AnnouncementRepository::new(db);
        let announcements = repo.find_visible(None).await.unwrap();

        assert!(announcements.is_empty());
    }
}
