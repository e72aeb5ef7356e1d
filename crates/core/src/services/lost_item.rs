//! Lost & found service.

use chrono::{DateTime, Utc};
use hosteldesk_common::{AppError, AppResult, IdGenerator};
use hosteldesk_db::{
    entities::{
        lost_item,
        lost_item::LostItemStatus,
        lost_item_claim,
        lost_item_claim::ClaimStatus,
        user,
    },
    repositories::LostItemRepository,
};
use sea_orm::Set;

/// Input for reporting a lost or found item.
#[derive(Debug, Clone)]
pub struct ReportItemInput {
    pub title: String,
    pub description: String,
    pub location: String,
    /// LOST or FOUND; RETURNED is reached only through the workflow.
    pub status: LostItemStatus,
    pub date: DateTime<Utc>,
    pub image_urls: Vec<String>,
}

/// Outcome of a claim submission.
///
/// A duplicate claim by the same claimant is a returned value, not an
/// error; callers check the shape instead of catching.
#[derive(Debug, Clone)]
pub enum ClaimSubmission {
    /// The claim was recorded with status PENDING.
    Submitted(lost_item_claim::Model),
    /// The claimant already has a claim on this item.
    AlreadyClaimed,
}

/// Lost & found service for business logic.
#[derive(Clone)]
pub struct LostItemService {
    lost_item_repo: LostItemRepository,
    id_gen: IdGenerator,
}

impl LostItemService {
    /// Create a new lost item service.
    #[must_use]
    pub fn new(lost_item_repo: LostItemRepository) -> Self {
        Self {
            lost_item_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Report a lost or found item.
    pub async fn report(
        &self,
        input: ReportItemInput,
        acting: &user::Model,
    ) -> AppResult<lost_item::Model> {
        if input.status == LostItemStatus::Returned {
            return Err(AppError::BadRequest(
                "Items are reported as LOST or FOUND".to_string(),
            ));
        }

        let model = lost_item::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(input.title),
            description: Set(input.description),
            status: Set(input.status),
            location: Set(input.location),
            date: Set(input.date),
            image_urls: Set(serde_json::json!(input.image_urls)),
            reporter_id: Set(acting.id.clone()),
            hostel_id: Set(acting.hostel_id.clone()),
            created_at: Set(Utc::now()),
        };

        let created = self.lost_item_repo.create(model).await?;
        tracing::info!(item_id = %created.id, reporter_id = %acting.id, "Lost item reported");

        Ok(created)
    }

    /// All items, newest first.
    pub async fn list(&self) -> AppResult<Vec<lost_item::Model>> {
        self.lost_item_repo.find_all().await
    }

    /// FOUND and RETURNED items with their claims (lost-and-found
    /// dashboard).
    pub async fn list_with_claims(
        &self,
    ) -> AppResult<Vec<(lost_item::Model, Vec<lost_item_claim::Model>)>> {
        self.lost_item_repo
            .find_with_claims(&[LostItemStatus::Found, LostItemStatus::Returned])
            .await
    }

    /// Submit a claim on an item.
    ///
    /// An existing claim by the same claimant yields
    /// [`ClaimSubmission::AlreadyClaimed`] rather than an error. The
    /// pre-check and the insert are separate statements; the unique index
    /// on (item, claimant) is what stops concurrent duplicates.
    pub async fn submit_claim(
        &self,
        lost_item_id: &str,
        description: String,
        proof_urls: Vec<String>,
        acting: &user::Model,
    ) -> AppResult<ClaimSubmission> {
        self.lost_item_repo.get_by_id(lost_item_id).await?;

        let existing = self
            .lost_item_repo
            .find_claim_by_item_and_claimant(lost_item_id, &acting.id)
            .await?;

        if existing.is_some() {
            return Ok(ClaimSubmission::AlreadyClaimed);
        }

        let model = lost_item_claim::ActiveModel {
            id: Set(self.id_gen.generate()),
            lost_item_id: Set(lost_item_id.to_string()),
            claimant_id: Set(acting.id.clone()),
            description: Set(description),
            proof_urls: Set(serde_json::json!(proof_urls)),
            status: Set(ClaimStatus::Pending),
            reviewed_at: Set(None),
            created_at: Set(Utc::now()),
        };

        let claim = self.lost_item_repo.create_claim(model).await?;
        tracing::info!(item_id = %lost_item_id, claimant_id = %acting.id, "Claim submitted");

        Ok(ClaimSubmission::Submitted(claim))
    }

    /// Approve a claim: the claim becomes APPROVED and the item RETURNED,
    /// atomically.
    pub async fn approve_claim(
        &self,
        lost_item_id: &str,
        claim_id: &str,
    ) -> AppResult<lost_item_claim::Model> {
        let approved = self
            .lost_item_repo
            .approve_claim(lost_item_id, claim_id)
            .await?;

        tracing::info!(item_id = %lost_item_id, claim_id = %claim_id, "Claim approved");

        Ok(approved)
    }

    /// Reporter-only transition of their own LOST item to RETURNED.
    pub async fn mark_as_found(
        &self,
        lost_item_id: &str,
        acting: &user::Model,
    ) -> AppResult<lost_item::Model> {
        let item = self.lost_item_repo.get_by_id(lost_item_id).await?;

        if item.reporter_id != acting.id {
            return Err(AppError::Forbidden(
                "Only the reporter can mark this item as found".to_string(),
            ));
        }
        if item.status != LostItemStatus::Lost {
            return Err(AppError::BadRequest(
                "Only LOST items can be marked as found".to_string(),
            ));
        }

        self.lost_item_repo.mark_returned(lost_item_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use hosteldesk_db::test_utils;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn service(db: MockDatabase) -> LostItemService {
        LostItemService::new(LostItemRepository::new(Arc::new(db.into_connection())))
    }

    #[tokio::test]
    async fn test_report_rejects_returned_status() {
        let acting = test_utils::student("user1");
        let service = service(MockDatabase::new(DatabaseBackend::Postgres));

        let input = ReportItemInput {
            title: "Black umbrella".to_string(),
            description: "Left in the common room".to_string(),
            location: "Common room".to_string(),
            status: LostItemStatus::Returned,
            date: test_utils::fixed_time(),
            image_urls: vec![],
        };

        let result = service.report(input, &acting).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_submit_claim_duplicate_returns_value_not_error() {
        let acting = test_utils::student("user2");
        let item = test_utils::lost_item("item1", "user1");
        let existing = test_utils::claim("claim1", "item1", "user2");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[item]])
            .append_query_results([[existing]]);

        let service = service(db);
        let result = service
            .submit_claim("item1", "Mine".to_string(), vec![], &acting)
            .await
            .unwrap();

        assert!(matches!(result, ClaimSubmission::AlreadyClaimed));
    }

    #[tokio::test]
    async fn test_submit_claim_inserts_pending() {
        let acting = test_utils::student("user2");
        let item = test_utils::lost_item("item1", "user1");
        let created = test_utils::claim("claim1", "item1", "user2");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[item]])
            .append_query_results([Vec::<lost_item_claim::Model>::new()])
            .append_query_results([[created]]);

        let service = service(db);
        let result = service
            .submit_claim(
                "item1",
                "It has my initials on the handle".to_string(),
                vec![],
                &acting,
            )
            .await
            .unwrap();

        match result {
            ClaimSubmission::Submitted(claim) => {
                assert_eq!(claim.status, ClaimStatus::Pending);
                assert!(claim.reviewed_at.is_none());
            }
            ClaimSubmission::AlreadyClaimed => panic!("Expected Submitted"),
        }
    }

    #[tokio::test]
    async fn test_submit_claim_missing_item_fails() {
        let acting = test_utils::student("user2");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<lost_item::Model>::new()]);

        let service = service(db);
        let result = service
            .submit_claim("ghost", "Mine".to_string(), vec![], &acting)
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_mark_as_found_reporter_only() {
        let other = test_utils::student("user2");
        let item = test_utils::lost_item("item1", "user1");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[item]]);

        let service = service(db);
        let result = service.mark_as_found("item1", &other).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_mark_as_found_requires_lost_status() {
        let reporter = test_utils::student("user1");
        let mut item = test_utils::lost_item("item1", "user1");
        item.status = LostItemStatus::Found;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[item]]);

        let service = service(db);
        let result = service.mark_as_found("item1", &reporter).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
