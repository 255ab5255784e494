use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Chirp, ChirpyStore, RefreshToken, User};
use crate::error::DatabaseError;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    // insertion order doubles as creation order
    chirps: Vec<Chirp>,
    refresh_tokens: HashMap<String, RefreshToken>,
}

/// Process-local store with the same constraints as the Postgres schema:
/// unique emails, token primary keys, cascading user deletion.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChirpyStore for InMemoryStore {
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.email == email) {
            return Err(DatabaseError::UniqueConstraintViolation(
                "users_email_key".to_string(),
            ));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
            is_chirpy_red: false,
        };
        tables.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.email == email && u.id != id) {
            return Err(DatabaseError::UniqueConstraintViolation(
                "users_email_key".to_string(),
            ));
        }

        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::NotFound("User not found".to_string()))?;
        user.email = email.to_string();
        user.hashed_password = hashed_password.to_string();
        user.updated_at = Utc::now();

        Ok(user.clone())
    }

    async fn set_user_red(&self, id: Uuid, is_chirpy_red: bool) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;

        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::NotFound("User not found".to_string()))?;
        user.is_chirpy_red = is_chirpy_red;
        user.updated_at = Utc::now();

        Ok(())
    }

    async fn delete_all_users(&self) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        tables.users.clear();
        tables.chirps.clear();
        tables.refresh_tokens.clear();
        Ok(())
    }

    async fn create_chirp(&self, body: &str, user_id: Uuid) -> Result<Chirp, DatabaseError> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&user_id) {
            return Err(DatabaseError::QueryExecution(
                "chirps_user_id_fkey violated".to_string(),
            ));
        }

        let now = Utc::now();
        let chirp = Chirp {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            body: body.to_string(),
            user_id,
        };
        tables.chirps.push(chirp.clone());

        Ok(chirp)
    }

    async fn get_chirps(&self) -> Result<Vec<Chirp>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.chirps.clone())
    }

    async fn get_chirps_by_user_id(&self, user_id: Uuid) -> Result<Vec<Chirp>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .chirps
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_chirp(&self, id: Uuid) -> Result<Option<Chirp>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.chirps.iter().find(|c| c.id == id).cloned())
    }

    async fn delete_chirp(&self, id: Uuid) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;

        let before = tables.chirps.len();
        tables.chirps.retain(|c| c.id != id);

        if tables.chirps.len() == before {
            return Err(DatabaseError::NotFound("Chirp not found".to_string()));
        }
        Ok(())
    }

    async fn create_refresh_token(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;

        if tables.refresh_tokens.contains_key(token) {
            return Err(DatabaseError::UniqueConstraintViolation(
                "refresh_tokens_pkey".to_string(),
            ));
        }

        let now = Utc::now();
        tables.refresh_tokens.insert(
            token.to_string(),
            RefreshToken {
                token: token.to_string(),
                created_at: now,
                updated_at: now,
                user_id,
                expires_at,
                revoked_at: None,
            },
        );

        Ok(())
    }

    async fn get_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.refresh_tokens.get(token).cloned())
    }

    async fn mark_token_revoked(
        &self,
        token: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;

        let record = tables
            .refresh_tokens
            .get_mut(token)
            .ok_or_else(|| DatabaseError::NotFound("Refresh token not found".to_string()))?;
        if record.revoked_at.is_none() {
            record.revoked_at = Some(revoked_at);
        }
        record.updated_at = revoked_at;

        Ok(())
    }
}
