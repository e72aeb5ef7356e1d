//! User service.

use hosteldesk_common::{AppError, AppResult};
use hosteldesk_db::{entities::user, repositories::UserRepository};

/// User service for authentication and reference lookups.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    /// Authenticate a user by email and password.
    ///
    /// Passwords are stored and compared verbatim; this reproduces the
    /// source system's seeded credentials.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<user::Model> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if user.password != password {
            return Err(AppError::Unauthorized);
        }

        Ok(user)
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// Find a user by ID, returning `None` when absent.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<user::Model>> {
        self.user_repo.find_by_id(id).await
    }

    /// All users as (id, name) pairs.
    pub async fn reference_list(&self) -> AppResult<Vec<(String, String)>> {
        self.user_repo.find_reference_list().await
    }
}
