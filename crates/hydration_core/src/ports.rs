//! crates/hydration_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or
//! token issuers.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{IssuedToken, User, UserCredentials, WaterLogEntry};

//=========================================================================================
// Core Error and Result Types
//=========================================================================================

/// The error taxonomy shared by the ports and the core services.
///
/// Every failure carries enough text to be surfaced to the caller as-is;
/// nothing is swallowed and nothing is retried inside the core.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Malformed or out-of-range input (amount below 1, goal below 100, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A referenced record does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// Missing, unknown or expired identity token.
    #[error("unauthorized")]
    Unauthorized,
    /// An invariant the data model should make impossible was observed.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// The underlying store could not complete the request.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

/// A convenience type alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Durable keyed storage for users and intake entries.
///
/// Implementations must make each `insert_intake` an independent atomic
/// insert (concurrent inserts never merge or drop entries) and each
/// `set_daily_goal` a single atomic field update.
#[async_trait]
pub trait HydrationStore: Send + Sync {
    // --- User Management ---

    /// Creates a user with a unique email. A duplicate email fails with
    /// `InvalidArgument`.
    async fn create_user(
        &self,
        email: &str,
        hashed_password: &str,
        daily_goal_ml: i32,
    ) -> CoreResult<User>;

    async fn user_by_id(&self, user_id: Uuid) -> CoreResult<User>;

    async fn credentials_by_email(&self, email: &str) -> CoreResult<UserCredentials>;

    /// Overwrites the stored goal and returns the value now stored.
    async fn set_daily_goal(&self, user_id: Uuid, daily_goal_ml: i32) -> CoreResult<i32>;

    // --- Intake Log Management ---

    /// Appends one immutable entry; the store assigns the id.
    async fn insert_intake(
        &self,
        user_id: Uuid,
        amount_ml: i32,
        occurred_at: DateTime<Utc>,
    ) -> CoreResult<WaterLogEntry>;

    /// Returns the user's entries with `start <= occurred_at <= end`,
    /// ordered ascending by `occurred_at`.
    async fn intake_between(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> CoreResult<Vec<WaterLogEntry>>;
}

/// Issues and validates the opaque bearer tokens that prove a user identity.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Mints a fresh token for the user with an implementation-defined expiry.
    async fn issue(&self, user_id: Uuid) -> CoreResult<IssuedToken>;

    /// Resolves a presented token to its user id. Unknown and expired tokens
    /// both fail with `Unauthorized`.
    async fn resolve(&self, token: &str) -> CoreResult<Uuid>;

    /// Invalidates a token so later `resolve` calls reject it.
    async fn revoke(&self, token: &str) -> CoreResult<()>;
}
