//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use std::sync::Arc;

use crate::config::Config;
use hydration_core::ports::{Authenticator, HydrationStore};
use hydration_core::services::{DashboardAggregator, GoalManager, IntakeLedger};

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn HydrationStore>,
    pub authenticator: Arc<dyn Authenticator>,
    pub goals: GoalManager,
    pub ledger: IntakeLedger,
    pub dashboard: DashboardAggregator,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wires the three core services onto the given port implementations.
    pub fn new(
        store: Arc<dyn HydrationStore>,
        authenticator: Arc<dyn Authenticator>,
        config: Arc<Config>,
    ) -> Self {
        let goals = GoalManager::new(store.clone());
        let ledger = IntakeLedger::new(store.clone());
        let dashboard = DashboardAggregator::new(goals.clone(), ledger.clone());
        Self {
            store,
            authenticator,
            goals,
            ledger,
            dashboard,
            config,
        }
    }
}
