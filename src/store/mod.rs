/// Persistence service
///
/// Handlers and the auth layer talk to storage only through `ChirpyStore`.
/// `PgStore` is the production implementation; `InMemoryStore` backs the
/// test suite and database-less local runs.

mod memory;
mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::DatabaseError;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub hashed_password: String,
    pub is_chirpy_red: bool,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Chirp {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub body: String,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RefreshToken {
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait ChirpyStore: Send + Sync {
    /// Fails with `UniqueConstraintViolation` if the email is taken
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, DatabaseError>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<User, DatabaseError>;

    async fn set_user_red(&self, id: Uuid, is_chirpy_red: bool) -> Result<(), DatabaseError>;

    /// Removes every user together with their chirps and refresh tokens
    async fn delete_all_users(&self) -> Result<(), DatabaseError>;

    async fn create_chirp(&self, body: &str, user_id: Uuid) -> Result<Chirp, DatabaseError>;

    /// All chirps, oldest first
    async fn get_chirps(&self) -> Result<Vec<Chirp>, DatabaseError>;

    /// Chirps by one author, oldest first
    async fn get_chirps_by_user_id(&self, user_id: Uuid) -> Result<Vec<Chirp>, DatabaseError>;

    async fn get_chirp(&self, id: Uuid) -> Result<Option<Chirp>, DatabaseError>;

    async fn delete_chirp(&self, id: Uuid) -> Result<(), DatabaseError>;

    async fn create_refresh_token(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), DatabaseError>;

    async fn get_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, DatabaseError>;

    /// Sets `revoked_at` if it is not already set; `NotFound` for unknown tokens
    async fn mark_token_revoked(
        &self,
        token: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<(), DatabaseError>;
}
