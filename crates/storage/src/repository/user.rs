use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::User;

pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Returns the user with this username, creating it on first sight.
    pub async fn find_or_create(&self, username: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username)
            VALUES ($1)
            ON CONFLICT (username)
            DO UPDATE SET username = EXCLUDED.username
            RETURNING user_id, username, created_at
            "#,
        )
        .bind(username)
        .fetch_one(self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, user_id: Uuid) -> Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, username, created_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }
}
