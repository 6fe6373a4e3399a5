//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `HydrationStore` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use hydration_core::domain::{User, UserCredentials, WaterLogEntry};
use hydration_core::ports::{CoreError, CoreResult, HydrationStore};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `HydrationStore` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// Maps a low-level sqlx failure onto the core taxonomy. Unique-key
/// violations are client mistakes (duplicate email); everything else means
/// the store could not serve the request.
fn store_error(e: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(ref db) = e {
        if db.code().as_deref() == Some("23505") {
            return CoreError::InvalidArgument(
                "a user with this email already exists".to_string(),
            );
        }
    }
    CoreError::StoreUnavailable(e.to_string())
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: Uuid,
    email: String,
    daily_goal_ml: i32,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            id: self.id,
            email: self.email,
            daily_goal_ml: self.daily_goal_ml,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    id: Uuid,
    email: String,
    password_hash: String,
    daily_goal_ml: i32,
}
impl CredentialsRecord {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            user_id: self.id,
            email: self.email,
            hashed_password: self.password_hash,
            daily_goal_ml: self.daily_goal_ml,
        }
    }
}

#[derive(FromRow)]
struct WaterLogRecord {
    id: Uuid,
    user_id: Uuid,
    amount_ml: i32,
    occurred_at: DateTime<Utc>,
}
impl WaterLogRecord {
    fn to_domain(self) -> WaterLogEntry {
        WaterLogEntry {
            id: self.id,
            user_id: self.user_id,
            amount_ml: self.amount_ml,
            occurred_at: self.occurred_at,
        }
    }
}

//=========================================================================================
// `HydrationStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl HydrationStore for DbAdapter {
    async fn create_user(
        &self,
        email: &str,
        hashed_password: &str,
        daily_goal_ml: i32,
    ) -> CoreResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (id, email, password_hash, daily_goal_ml) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, email, daily_goal_ml",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(hashed_password)
        .bind(daily_goal_ml)
        .fetch_one(&self.pool)
        .await
        .map_err(store_error)?;
        Ok(record.to_domain())
    }

    async fn user_by_id(&self, user_id: Uuid) -> CoreResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, email, daily_goal_ml FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?
        .ok_or_else(|| CoreError::NotFound(format!("user {} not found", user_id)))?;
        Ok(record.to_domain())
    }

    async fn credentials_by_email(&self, email: &str) -> CoreResult<UserCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT id, email, password_hash, daily_goal_ml FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?
        .ok_or_else(|| CoreError::NotFound(format!("no user with email {}", email)))?;
        Ok(record.to_domain())
    }

    async fn set_daily_goal(&self, user_id: Uuid, daily_goal_ml: i32) -> CoreResult<i32> {
        // A single atomic field update; concurrent updates race at the store
        // and the last accepted write wins.
        let row: Option<(i32,)> = sqlx::query_as(
            "UPDATE users SET daily_goal_ml = $1 WHERE id = $2 RETURNING daily_goal_ml",
        )
        .bind(daily_goal_ml)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;
        row.map(|(goal,)| goal)
            .ok_or_else(|| CoreError::NotFound(format!("user {} not found", user_id)))
    }

    async fn insert_intake(
        &self,
        user_id: Uuid,
        amount_ml: i32,
        occurred_at: DateTime<Utc>,
    ) -> CoreResult<WaterLogEntry> {
        let record = sqlx::query_as::<_, WaterLogRecord>(
            "INSERT INTO water_logs (id, user_id, amount_ml, occurred_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, user_id, amount_ml, occurred_at",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(amount_ml)
        .bind(occurred_at)
        .fetch_one(&self.pool)
        .await
        .map_err(store_error)?;
        Ok(record.to_domain())
    }

    async fn intake_between(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> CoreResult<Vec<WaterLogEntry>> {
        // Inclusive at both ends; served by the (user_id, occurred_at) index.
        let records = sqlx::query_as::<_, WaterLogRecord>(
            "SELECT id, user_id, amount_ml, occurred_at FROM water_logs \
             WHERE user_id = $1 AND occurred_at >= $2 AND occurred_at <= $3 \
             ORDER BY occurred_at ASC",
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }
}
