//! Announcement service.

use chrono::{DateTime, Utc};
use hosteldesk_common::{AppError, AppResult, IdGenerator};
use hosteldesk_db::{
    entities::{announcement, issue::Priority, user},
    repositories::AnnouncementRepository,
};
use sea_orm::Set;

/// Input for creating an announcement.
#[derive(Debug, Clone)]
pub struct CreateAnnouncementInput {
    pub title: String,
    pub content: String,
    pub priority: Priority,
    pub is_pinned: bool,
    /// `None` broadcasts to every hostel.
    pub target_hostel_id: Option<String>,
    pub target_block_id: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Announcement service for business logic.
#[derive(Clone)]
pub struct AnnouncementService {
    announcement_repo: AnnouncementRepository,
    id_gen: IdGenerator,
}

impl AnnouncementService {
    /// Create a new announcement service.
    #[must_use]
    pub fn new(announcement_repo: AnnouncementRepository) -> Self {
        Self {
            announcement_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new announcement (admin only).
    pub async fn create(
        &self,
        input: CreateAnnouncementInput,
        acting: &user::Model,
    ) -> AppResult<announcement::Model> {
        if !acting.is_admin() {
            return Err(AppError::Forbidden(
                "Only admins can create announcements".to_string(),
            ));
        }

        let model = announcement::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(input.title),
            content: Set(input.content),
            priority: Set(input.priority),
            is_pinned: Set(input.is_pinned),
            author_id: Set(acting.id.clone()),
            target_hostel_id: Set(input.target_hostel_id),
            target_block_id: Set(input.target_block_id),
            expires_at: Set(input.expires_at),
            created_at: Set(Utc::now()),
        };

        let created = self.announcement_repo.create(model).await?;
        tracing::info!(announcement_id = %created.id, author_id = %acting.id, "Announcement posted");

        Ok(created)
    }

    /// Announcements visible to the viewer: global ones plus those
    /// targeting the viewer's hostel, unexpired, pinned first.
    pub async fn list_for(&self, viewer: &user::Model) -> AppResult<Vec<announcement::Model>> {
        self.announcement_repo
            .find_visible(viewer.hostel_id.as_deref())
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use hosteldesk_db::test_utils;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_input() -> CreateAnnouncementInput {
        CreateAnnouncementInput {
            title: "Water outage".to_string(),
            content: "Maintenance on Saturday morning".to_string(),
            priority: Priority::High,
            is_pinned: false,
            target_hostel_id: None,
            target_block_id: None,
            expires_at: None,
        }
    }

    #[tokio::test]
    async fn test_create_requires_admin() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = AnnouncementService::new(AnnouncementRepository::new(db));

        for acting in [
            test_utils::student("user1"),
            test_utils::staff("staff1", hosteldesk_db::entities::user::Specialization::Cleaner),
        ] {
            let result = service.create(create_input(), &acting).await;
            assert!(matches!(result, Err(AppError::Forbidden(_))));
        }
    }

    #[tokio::test]
    async fn test_create_as_admin_succeeds() {
        let admin = test_utils::admin("admin1");

        let created = announcement::Model {
            id: "a1".to_string(),
            title: "Water outage".to_string(),
            content: "Maintenance on Saturday morning".to_string(),
            priority: Priority::High,
            is_pinned: false,
            author_id: "admin1".to_string(),
            target_hostel_id: None,
            target_block_id: None,
            expires_at: None,
            created_at: test_utils::fixed_time(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[created]])
                .into_connection(),
        );
        let service = AnnouncementService::new(AnnouncementRepository::new(db));

        let announcement = service.create(create_input(), &admin).await.unwrap();

        assert_eq!(announcement.author_id, "admin1");
        assert!(announcement.target_hostel_id.is_none());
    }
}
