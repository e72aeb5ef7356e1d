//! Hostel, block and room repository.
//!
//! The location hierarchy is static reference data; this repository only
//! reads it.

use std::sync::Arc;

use hosteldesk_common::{AppError, AppResult};
use sea_orm::{DatabaseConnection, EntityTrait, Order, QueryOrder};

use crate::entities::{Block, Hostel, Room, block, hostel, room};

/// Repository for the hostel/block/room hierarchy.
#[derive(Clone)]
pub struct HostelRepository {
    db: Arc<DatabaseConnection>,
}

impl HostelRepository {
    /// Create a new hostel repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// All hostels, ordered by name.
    pub async fn find_all(&self) -> AppResult<Vec<hostel::Model>> {
        Hostel::find()
            .order_by(hostel::Column::Name, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find hostel by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<hostel::Model>> {
        Hostel::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All blocks across all hostels.
    pub async fn find_all_blocks(&self) -> AppResult<Vec<block::Model>> {
        Block::find()
            .order_by(block::Column::Name, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find block by ID.
    pub async fn find_block_by_id(&self, id: &str) -> AppResult<Option<block::Model>> {
        Block::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find room by ID.
    pub async fn find_room_by_id(&self, id: &str) -> AppResult<Option<room::Model>> {
        Room::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
