//! crates/hydration_core/src/services/ledger.rs
//!
//! Appends intake events and computes the "today" window total and ordered
//! log for a user.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::WaterLogEntry;
use crate::ports::{CoreError, CoreResult, HydrationStore};

/// The inclusive `[start, end]` range of the reference day:
/// 00:00:00.000 through 23:59:59.999 of the day `reference_now` falls on.
pub fn day_window(reference_now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let day = reference_now.date_naive();
    let start = day
        .and_hms_milli_opt(0, 0, 0, 0)
        .expect("midnight is a valid wall-clock time")
        .and_utc();
    let end = day
        .and_hms_milli_opt(23, 59, 59, 999)
        .expect("23:59:59.999 is a valid wall-clock time")
        .and_utc();
    (start, end)
}

/// Append-only intake log. Entries are never merged, deduplicated or
/// mutated; every read recomputes its result from the store.
#[derive(Clone)]
pub struct IntakeLedger {
    store: Arc<dyn HydrationStore>,
}

impl IntakeLedger {
    pub fn new(store: Arc<dyn HydrationStore>) -> Self {
        Self { store }
    }

    /// Records one intake event. `occurred_at` defaults to `now` when the
    /// caller does not supply a timestamp.
    pub async fn log_intake(
        &self,
        user_id: Uuid,
        amount_ml: i32,
        occurred_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> CoreResult<WaterLogEntry> {
        if amount_ml < 1 {
            return Err(CoreError::InvalidArgument(format!(
                "intake amount must be at least 1 ml, got {amount_ml}"
            )));
        }
        // Every entry must reference an existing user.
        self.store.user_by_id(user_id).await?;
        self.store
            .insert_intake(user_id, amount_ml, occurred_at.unwrap_or(now))
            .await
    }

    /// All of the user's entries within the reference day, ascending by
    /// `occurred_at`. Freshly recomputed on every call.
    pub async fn list_today(
        &self,
        user_id: Uuid,
        reference_now: DateTime<Utc>,
    ) -> CoreResult<Vec<WaterLogEntry>> {
        let (start, end) = day_window(reference_now);
        self.store.intake_between(user_id, start, end).await
    }

    /// The day's total in milliliters; 0 when nothing was logged.
    pub async fn total_today(
        &self,
        user_id: Uuid,
        reference_now: DateTime<Utc>,
    ) -> CoreResult<i64> {
        let entries = self.list_today(user_id, reference_now).await?;
        Ok(entries.iter().map(|e| i64::from(e.amount_ml)).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DEFAULT_DAILY_GOAL_ML;
    use crate::services::testing::MemoryStore;
    use chrono::NaiveDate;

    fn ledger() -> (IntakeLedger, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (IntakeLedger::new(store.clone()), store)
    }

    fn at(h: u32, m: u32, s: u32, ms: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2024, 5, 10)
            .unwrap()
            .and_hms_milli_opt(h, m, s, ms)
            .unwrap()
            .and_utc()
    }

    #[tokio::test]
    async fn a_logged_entry_shows_up_in_today_exactly_once() {
        let (ledger, store) = ledger();
        let user_id = store.seed_user("a@example.com", DEFAULT_DAILY_GOAL_ML);
        let now = at(9, 0, 0, 0);

        let entry = ledger.log_intake(user_id, 250, None, now).await.unwrap();
        let today = ledger.list_today(user_id, now).await.unwrap();

        assert_eq!(today, vec![entry]);
    }

    #[tokio::test]
    async fn occurred_at_defaults_to_the_reference_clock() {
        let (ledger, store) = ledger();
        let user_id = store.seed_user("a@example.com", DEFAULT_DAILY_GOAL_ML);
        let now = at(14, 30, 0, 0);

        let entry = ledger.log_intake(user_id, 100, None, now).await.unwrap();
        assert_eq!(entry.occurred_at, now);

        let explicit = at(8, 0, 0, 0);
        let entry = ledger
            .log_intake(user_id, 100, Some(explicit), now)
            .await
            .unwrap();
        assert_eq!(entry.occurred_at, explicit);
    }

    #[tokio::test]
    async fn non_positive_amounts_are_rejected() {
        let (ledger, store) = ledger();
        let user_id = store.seed_user("a@example.com", DEFAULT_DAILY_GOAL_ML);
        let now = at(9, 0, 0, 0);

        for amount in [0, -5] {
            let err = ledger.log_intake(user_id, amount, None, now).await.unwrap_err();
            assert!(matches!(err, CoreError::InvalidArgument(_)));
        }
        assert!(ledger.list_today(user_id, now).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn logging_for_an_unknown_user_fails_with_not_found() {
        let (ledger, _store) = ledger();
        let err = ledger
            .log_intake(Uuid::new_v4(), 250, None, at(9, 0, 0, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn identical_amounts_are_kept_as_separate_entries() {
        let (ledger, store) = ledger();
        let user_id = store.seed_user("a@example.com", DEFAULT_DAILY_GOAL_ML);
        let now = at(9, 0, 0, 0);

        ledger.log_intake(user_id, 200, Some(now), now).await.unwrap();
        ledger.log_intake(user_id, 200, Some(now), now).await.unwrap();

        assert_eq!(ledger.list_today(user_id, now).await.unwrap().len(), 2);
        assert_eq!(ledger.total_today(user_id, now).await.unwrap(), 400);
    }

    #[tokio::test]
    async fn entries_come_back_in_chronological_order() {
        let (ledger, store) = ledger();
        let user_id = store.seed_user("a@example.com", DEFAULT_DAILY_GOAL_ML);
        let now = at(20, 0, 0, 0);

        ledger
            .log_intake(user_id, 300, Some(at(18, 0, 0, 0)), now)
            .await
            .unwrap();
        ledger
            .log_intake(user_id, 100, Some(at(7, 15, 0, 0)), now)
            .await
            .unwrap();
        ledger
            .log_intake(user_id, 200, Some(at(12, 45, 0, 0)), now)
            .await
            .unwrap();

        let amounts: Vec<i32> = ledger
            .list_today(user_id, now)
            .await
            .unwrap()
            .iter()
            .map(|e| e.amount_ml)
            .collect();
        assert_eq!(amounts, vec![100, 200, 300]);
    }

    #[tokio::test]
    async fn the_day_window_is_inclusive_at_both_boundaries() {
        let (ledger, store) = ledger();
        let user_id = store.seed_user("a@example.com", DEFAULT_DAILY_GOAL_ML);
        let now = at(12, 0, 0, 0);

        // First and last representable millisecond of the day.
        ledger
            .log_intake(user_id, 10, Some(at(0, 0, 0, 0)), now)
            .await
            .unwrap();
        ledger
            .log_intake(user_id, 20, Some(at(23, 59, 59, 999)), now)
            .await
            .unwrap();
        // Midnight of the next day falls outside the window.
        let next_midnight = NaiveDate::from_ymd_opt(2024, 5, 11)
            .unwrap()
            .and_hms_milli_opt(0, 0, 0, 0)
            .unwrap()
            .and_utc();
        ledger
            .log_intake(user_id, 40, Some(next_midnight), now)
            .await
            .unwrap();

        let today = ledger.list_today(user_id, now).await.unwrap();
        assert_eq!(today.len(), 2);
        assert_eq!(ledger.total_today(user_id, now).await.unwrap(), 30);
    }

    #[tokio::test]
    async fn entries_from_other_users_and_other_days_are_excluded() {
        let (ledger, store) = ledger();
        let user_id = store.seed_user("a@example.com", DEFAULT_DAILY_GOAL_ML);
        let other_id = store.seed_user("b@example.com", DEFAULT_DAILY_GOAL_ML);
        let now = at(12, 0, 0, 0);

        ledger.log_intake(user_id, 250, Some(now), now).await.unwrap();
        ledger.log_intake(other_id, 999, Some(now), now).await.unwrap();
        let yesterday = at(12, 0, 0, 0) - chrono::Duration::days(1);
        ledger
            .log_intake(user_id, 500, Some(yesterday), now)
            .await
            .unwrap();

        assert_eq!(ledger.total_today(user_id, now).await.unwrap(), 250);
    }

    #[tokio::test]
    async fn total_equals_the_sum_over_the_listed_entries() {
        let (ledger, store) = ledger();
        let user_id = store.seed_user("a@example.com", DEFAULT_DAILY_GOAL_ML);
        let now = at(12, 0, 0, 0);

        assert_eq!(ledger.total_today(user_id, now).await.unwrap(), 0);

        for (i, amount) in [250, 500, 125, 1].into_iter().enumerate() {
            ledger
                .log_intake(user_id, amount, Some(at(8 + i as u32, 0, 0, 0)), now)
                .await
                .unwrap();
        }

        let listed: i64 = ledger
            .list_today(user_id, now)
            .await
            .unwrap()
            .iter()
            .map(|e| i64::from(e.amount_ml))
            .sum();
        assert_eq!(ledger.total_today(user_id, now).await.unwrap(), listed);
        assert_eq!(listed, 876);
    }
}
