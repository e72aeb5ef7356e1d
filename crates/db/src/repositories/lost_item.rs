//! Lost item repository.
//!
//! Items and their claims. Claim approval is the one transactional write:
//! the claim update and the item status update commit together.

use std::sync::Arc;

use chrono::Utc;
use hosteldesk_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};

use crate::entities::{
    LostItem, LostItemClaim, lost_item,
    lost_item::LostItemStatus,
    lost_item_claim,
    lost_item_claim::ClaimStatus,
};

/// Repository for lost-and-found operations.
#[derive(Clone)]
pub struct LostItemRepository {
    db: Arc<DatabaseConnection>,
}

impl LostItemRepository {
    /// Create a new lost item repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find item by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<lost_item::Model>> {
        LostItem::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get item by ID, failing if absent.
    pub async fn get_by_id(&self, id: &str) -> AppResult<lost_item::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Lost item not found: {id}")))
    }

    /// Insert a new item.
    pub async fn create(&self, model: lost_item::ActiveModel) -> AppResult<lost_item::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All items, newest first.
    pub async fn find_all(&self) -> AppResult<Vec<lost_item::Model>> {
        LostItem::find()
            .order_by(lost_item::Column::CreatedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Items in the given statuses, each with its claims, newest first.
    pub async fn find_with_claims(
        &self,
        statuses: &[LostItemStatus],
    ) -> AppResult<Vec<(lost_item::Model, Vec<lost_item_claim::Model>)>> {
        LostItem::find()
            .filter(lost_item::Column::Status.is_in(statuses.iter().copied()))
            .order_by(lost_item::Column::CreatedAt, Order::Desc)
            .find_with_related(LostItemClaim)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a claim by (item, claimant) — the duplicate-claim pre-check.
    pub async fn find_claim_by_item_and_claimant(
        &self,
        lost_item_id: &str,
        claimant_id: &str,
    ) -> AppResult<Option<lost_item_claim::Model>> {
        LostItemClaim::find()
            .filter(lost_item_claim::Column::LostItemId.eq(lost_item_id))
            .filter(lost_item_claim::Column::ClaimantId.eq(claimant_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a new claim.
    pub async fn create_claim(
        &self,
        model: lost_item_claim::ActiveModel,
    ) -> AppResult<lost_item_claim::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Approve a claim and mark its item RETURNED, atomically.
    ///
    /// Both updates commit together or not at all. Fails `NotFound` when
    /// the claim does not exist or does not belong to the item.
    pub async fn approve_claim(
        &self,
        lost_item_id: &str,
        claim_id: &str,
    ) -> AppResult<lost_item_claim::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let claim = LostItemClaim::find_by_id(claim_id)
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Claim not found: {claim_id}")))?;

        if claim.lost_item_id != lost_item_id {
            return Err(AppError::NotFound(format!(
                "Claim not found: {claim_id}"
            )));
        }

        let item = LostItem::find_by_id(lost_item_id)
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Lost item not found: {lost_item_id}")))?;

        let now = Utc::now();

        let mut claim_active: lost_item_claim::ActiveModel = claim.into();
        claim_active.status = Set(ClaimStatus::Approved);
        claim_active.reviewed_at = Set(Some(now));

        let approved = claim_active
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut item_active: lost_item::ActiveModel = item.into();
        item_active.status = Set(LostItemStatus::Returned);

        item_active
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(approved)
    }

    /// Mark an item RETURNED (reporter recovered it themselves).
    pub async fn mark_returned(&self, lost_item_id: &str) -> AppResult<lost_item::Model> {
        let item = self.get_by_id(lost_item_id).await?;

        let mut active: lost_item::ActiveModel = item.into();
        active.status = Set(LostItemStatus::Returned);

        active
            .update(self.db.as_ref())
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
                .append_query_results([Vec::<lost_item::Model>::new()])
                .into_connection(),
        );

        let repo = LostItemRepository::new(db);
        let result = repo.get_by_id("ghost").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find_claim_pre_check_absent() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<lost_item_claim::Model>::new()])
                .into_connection(),
        );

        let repo = LostItemRepository::new(db);
        let found = repo
            .find_claim_by_item_and_claimant("item1", "user1")
            .await
            .unwrap();

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_approve_claim_updates_pair() {
        let claim = test_utils::claim("claim1", "item1", "user2");
        let item = test_utils::lost_item("item1", "user1");

        let mut approved = claim.clone();
        approved.status = ClaimStatus::Approved;
        approved.reviewed_at = Some(test_utils::fixed_time());

        let mut returned = item.clone();
        returned.status = LostItemStatus::Returned;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[claim]])
                .append_query_results([[item]])
                .append_query_results([[approved]])
                .append_query_results([[returned]])
                .into_connection(),
        );

        let repo = LostItemRepository::new(db);
        let result = repo.approve_claim("item1", "claim1").await.unwrap();

        assert_eq!(result.status, ClaimStatus::Approved);
        assert!(result.reviewed_at.is_some());
    }

    #[tokio::test]
    async fn test_approve_claim_wrong_item_fails() {
        let claim = test_utils::claim("claim1", "other-item", "user2");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[claim]])
                .into_connection(),
        );

        let repo = LostItemRepository::new(db);
        let result = repo.approve_claim("item1", "claim1").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_approve_claim_aborts_when_item_update_fails() {
        let claim = test_utils::claim("claim1", "item1", "user2");
        let item = test_utils::lost_item("item1", "user1");

        let mut approved = claim.clone();
        approved.status = ClaimStatus::Approved;

        // Claim update succeeds, item update returns nothing: the pair must
        // surface an error (and roll back).
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[claim]])
                .append_query_results([[item]])
                .append_query_results([[approved]])
                .append_query_results([Vec::<lost_item::Model>::new()])
                .into_connection(),
        );

        let repo = LostItemRepository::new(db);
        let result = repo.approve_claim("item1", "claim1").await;

        assert!(result.is_err());
    }
}
