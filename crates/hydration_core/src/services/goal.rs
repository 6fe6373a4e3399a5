//! crates/hydration_core/src/services/goal.rs
//!
//! Owns a user's current daily goal: reads it and applies validated updates.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::MIN_DAILY_GOAL_ML;
use crate::ports::{CoreError, CoreResult, HydrationStore};

/// Validates and applies daily-goal changes. No history of past goals is
/// kept; concurrent updates race on store-level atomicity and the last write
/// accepted by the store wins.
#[derive(Clone)]
pub struct GoalManager {
    store: Arc<dyn HydrationStore>,
}

impl GoalManager {
    pub fn new(store: Arc<dyn HydrationStore>) -> Self {
        Self { store }
    }

    /// Returns the user's current daily goal in milliliters.
    pub async fn goal(&self, user_id: Uuid) -> CoreResult<i32> {
        Ok(self.store.user_by_id(user_id).await?.daily_goal_ml)
    }

    /// Stores a new daily goal and returns it. Setting the same value twice
    /// is a no-op the second time, not an error.
    pub async fn set_goal(&self, user_id: Uuid, new_goal_ml: i32) -> CoreResult<i32> {
        if new_goal_ml < MIN_DAILY_GOAL_ML {
            return Err(CoreError::InvalidArgument(format!(
                "daily goal must be at least {MIN_DAILY_GOAL_ML} ml, got {new_goal_ml}"
            )));
        }
        self.store.set_daily_goal(user_id, new_goal_ml).await
    }
}
