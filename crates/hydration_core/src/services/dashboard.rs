//! crates/hydration_core/src/services/dashboard.rs
//!
//! Composes the goal and the intake log into a single progress view.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::DailySnapshot;
use crate::ports::{CoreError, CoreResult};
use crate::services::{GoalManager, IntakeLedger};

/// Read-only composition of `GoalManager` and `IntakeLedger`. The snapshot
/// is recomputed on every call rather than cached, so it always reflects the
/// latest durable writes.
#[derive(Clone)]
pub struct DashboardAggregator {
    goals: GoalManager,
    ledger: IntakeLedger,
}

impl DashboardAggregator {
    pub fn new(goals: GoalManager, ledger: IntakeLedger) -> Self {
        Self { goals, ledger }
    }

    /// The user's "today" view: ordered entries, their total, the current
    /// goal and the progress ratio clamped to 1.0.
    pub async fn daily_snapshot(
        &self,
        user_id: Uuid,
        reference_now: DateTime<Utc>,
    ) -> CoreResult<DailySnapshot> {
        let daily_goal_ml = self.goals.goal(user_id).await?;
        let entries = self.ledger.list_today(user_id, reference_now).await?;
        // The total is summed from the same scan the entries come from, so
        // the two can never disagree within one snapshot.
        let total_intake_ml: i64 = entries.iter().map(|e| i64::from(e.amount_ml)).sum();

        // The >= 100 invariant on stored goals makes this unreachable; the
        // guard keeps a corrupted record from turning into a division by zero.
        if daily_goal_ml == 0 {
            return Err(CoreError::InvalidState(format!(
                "user {user_id} has a zero daily goal"
            )));
        }
        let progress_ratio = (total_intake_ml as f64 / f64::from(daily_goal_ml)).min(1.0);

        Ok(DailySnapshot {
            total_intake_ml,
            daily_goal_ml,
            entries,
            progress_ratio,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DEFAULT_DAILY_GOAL_ML;
    use crate::services::testing::MemoryStore;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn dashboard() -> (DashboardAggregator, IntakeLedger, Arc<MemoryStore>) {
        let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
        let goals = GoalManager::new(store.clone());
        let ledger = IntakeLedger::new(store.clone());
        (
            DashboardAggregator::new(goals, ledger.clone()),
            ledger,
            store,
        )
    }

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2024, 5, 10)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
            .and_utc()
    }

    #[tokio::test]
    async fn two_morning_glasses_against_a_2000ml_goal() {
        let (dashboard, ledger, store) = dashboard();
        let user_id = store.seed_user("a@example.com", 2000);
        let now = at(10, 0);

        ledger
            .log_intake(user_id, 250, Some(at(8, 0)), now)
            .await
            .unwrap();
        ledger
            .log_intake(user_id, 500, Some(at(9, 30)), now)
            .await
            .unwrap();

        let snapshot = dashboard.daily_snapshot(user_id, now).await.unwrap();
        assert_eq!(snapshot.total_intake_ml, 750);
        assert_eq!(snapshot.daily_goal_ml, 2000);
        assert_eq!(snapshot.progress_ratio, 0.375);
        let amounts: Vec<i32> = snapshot.entries.iter().map(|e| e.amount_ml).collect();
        assert_eq!(amounts, vec![250, 500]);
    }

    #[tokio::test]
    async fn a_fresh_user_sees_an_empty_snapshot() {
        let (dashboard, _ledger, store) = dashboard();
        let user_id = store.seed_user("a@example.com", DEFAULT_DAILY_GOAL_ML);

        let snapshot = dashboard.daily_snapshot(user_id, at(10, 0)).await.unwrap();
        assert_eq!(snapshot.total_intake_ml, 0);
        assert_eq!(snapshot.progress_ratio, 0.0);
        assert!(snapshot.entries.is_empty());
    }

    #[tokio::test]
    async fn the_ratio_is_clamped_once_the_goal_is_exceeded() {
        let (dashboard, ledger, store) = dashboard();
        let user_id = store.seed_user("a@example.com", 100);
        let now = at(10, 0);

        ledger
            .log_intake(user_id, 5000, Some(at(9, 0)), now)
            .await
            .unwrap();

        let snapshot = dashboard.daily_snapshot(user_id, now).await.unwrap();
        assert_eq!(snapshot.total_intake_ml, 5000);
        assert_eq!(snapshot.progress_ratio, 1.0);
    }

    #[tokio::test]
    async fn the_ratio_stays_within_the_unit_interval() {
        let (dashboard, ledger, store) = dashboard();
        let user_id = store.seed_user("a@example.com", 2000);
        let now = at(10, 0);

        for logged in [1, 999, 1000, 10_000] {
            ledger
                .log_intake(user_id, logged, Some(at(9, 0)), now)
                .await
                .unwrap();
            let ratio = dashboard
                .daily_snapshot(user_id, now)
                .await
                .unwrap()
                .progress_ratio;
            assert!((0.0..=1.0).contains(&ratio), "ratio {ratio} out of range");
        }
    }

    #[tokio::test]
    async fn an_unknown_user_fails_with_not_found() {
        let (dashboard, _ledger, _store) = dashboard();
        let err = dashboard
            .daily_snapshot(Uuid::new_v4(), at(10, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn a_zero_goal_is_reported_as_invalid_state_not_a_panic() {
        let (dashboard, _ledger, store) = dashboard();
        // seed_user bypasses the >= 100 floor on purpose.
        let user_id = store.seed_user("a@example.com", 0);

        let err = dashboard.daily_snapshot(user_id, at(10, 0)).await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidState(_)));
    }

    #[tokio::test]
    async fn goal_changes_are_visible_on_the_next_snapshot() {
        let (dashboard, ledger, store) = dashboard();
        let user_id = store.seed_user("a@example.com", 2000);
        let goals = GoalManager::new(store.clone());
        let now = at(10, 0);

        ledger
            .log_intake(user_id, 500, Some(at(9, 0)), now)
            .await
            .unwrap();
        assert_eq!(
            dashboard.daily_snapshot(user_id, now).await.unwrap().progress_ratio,
            0.25
        );

        goals.set_goal(user_id, 1000).await.unwrap();
        let snapshot = dashboard.daily_snapshot(user_id, now).await.unwrap();
        assert_eq!(snapshot.daily_goal_ml, 1000);
        assert_eq!(snapshot.progress_ratio, 0.5);
    }
}
