//! crates/hydration_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// The smallest daily goal a user may set, in milliliters.
pub const MIN_DAILY_GOAL_ML: i32 = 100;

/// The goal assigned to a new account when none is supplied, in milliliters.
pub const DEFAULT_DAILY_GOAL_ML: i32 = 2000;

// Represents a user - used throughout the app
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub daily_goal_ml: i32,
}

// Only used internally for login/signup - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub email: String,
    pub hashed_password: String,
    pub daily_goal_ml: i32,
}

/// A single recorded instance of water consumption.
///
/// Entries are immutable once written; there is no update or delete path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaterLogEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount_ml: i32,
    pub occurred_at: DateTime<Utc>,
}

/// An opaque bearer token handed to a client at registration or login.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// The composed "today" view: total, goal, ordered entries and the
/// goal-progress ratio clamped to 1.0.
#[derive(Debug, Clone)]
pub struct DailySnapshot {
    pub total_intake_ml: i64,
    pub daily_goal_ml: i32,
    pub entries: Vec<WaterLogEntry>,
    pub progress_ratio: f64,
}
