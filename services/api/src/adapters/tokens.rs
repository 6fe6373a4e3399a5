//! services/api/src/adapters/tokens.rs
//!
//! This module contains the token adapter, the concrete implementation of the
//! `Authenticator` port. Tokens are opaque UUIDs persisted in PostgreSQL with
//! an expiry, so revocation takes effect immediately on every instance.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use hydration_core::domain::IssuedToken;
use hydration_core::ports::{Authenticator, CoreError, CoreResult};

/// An adapter that implements the `Authenticator` port with database-backed
/// bearer tokens.
#[derive(Clone)]
pub struct TokenAdapter {
    pool: PgPool,
    ttl: Duration,
}

impl TokenAdapter {
    /// Creates a new `TokenAdapter` issuing tokens valid for `ttl_days`.
    pub fn new(pool: PgPool, ttl_days: i64) -> Self {
        Self {
            pool,
            ttl: Duration::days(ttl_days),
        }
    }
}

fn store_error(e: sqlx::Error) -> CoreError {
    CoreError::StoreUnavailable(e.to_string())
}

#[async_trait]
impl Authenticator for TokenAdapter {
    async fn issue(&self, user_id: Uuid) -> CoreResult<IssuedToken> {
        let token = Uuid::new_v4().to_string();
        let expires_at = Utc::now() + self.ttl;
        sqlx::query("INSERT INTO auth_tokens (token, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(&token)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(IssuedToken {
            token,
            user_id,
            expires_at,
        })
    }

    async fn resolve(&self, token: &str) -> CoreResult<Uuid> {
        let row: Option<(Uuid, DateTime<Utc>)> =
            sqlx::query_as("SELECT user_id, expires_at FROM auth_tokens WHERE token = $1")
                .bind(token)
                .fetch_optional(&self.pool)
                .await
                .map_err(store_error)?;
        match row {
            Some((user_id, expires_at)) if expires_at > Utc::now() => Ok(user_id),
            // Unknown and expired tokens are indistinguishable to the caller.
            _ => Err(CoreError::Unauthorized),
        }
    }

    async fn revoke(&self, token: &str) -> CoreResult<()> {
        sqlx::query("DELETE FROM auth_tokens WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(())
    }
}
