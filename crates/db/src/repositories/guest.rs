//! Guest repository.

use std::sync::Arc;

use crate::entities::{Guest, guest};
use banquet_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, SqlErr,
};

/// Guest repository for database operations.
#[derive(Clone)]
pub struct GuestRepository {
    db: Arc<DatabaseConnection>,
}

impl GuestRepository {
    /// Create a new guest repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a guest by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<guest::Model>> {
        Guest::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a guest by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<guest::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::GuestNotFound(id.to_string()))
    }

    /// Find a guest by the unique (first name, last name) pair.
    pub async fn find_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> AppResult<Option<guest::Model>> {
        Guest::find()
            .filter(guest::Column::FirstName.eq(first_name))
            .filter(guest::Column::LastName.eq(last_name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a guest by RSVP token.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<guest::Model>> {
        Guest::find()
            .filter(guest::Column::RsvpToken.eq(token))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all guests ordered by (last name, first name).
    pub async fn list(&self) -> AppResult<Vec<guest::Model>> {
        Guest::find()
            .order_by_asc(guest::Column::LastName)
            .order_by_asc(guest::Column::FirstName)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List guests that have no RSVP token yet (legacy rows).
    pub async fn list_without_token(&self) -> AppResult<Vec<guest::Model>> {
        Guest::find()
            .filter(guest::Column::RsvpToken.is_null())
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a new guest.
    ///
    /// Unique-index violations are mapped to domain errors so callers can
    /// distinguish a name collision from a token collision.
    pub async fn create(&self, model: guest::ActiveModel) -> AppResult<guest::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_write_err)
    }

    /// Update an existing guest.
    pub async fn update(&self, model: guest::ActiveModel) -> AppResult<guest::Model> {
        model.update(self.db.as_ref()).await.map_err(map_write_err)
    }

    /// Hard-delete a guest by ID.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = Guest::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::GuestNotFound(id.to_string()));
        }

        Ok(())
    }
}

/// Map write errors, turning unique-index violations into domain errors.
fn map_write_err(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => {
            if msg.contains("idx_guest_token") {
                AppError::DuplicateToken(msg)
            } else {
                AppError::DuplicateGuest("a guest with this name already exists".to_string())
            }
        }
        _ => AppError::Database(err.to_string()),
    }
}
