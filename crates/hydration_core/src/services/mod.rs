//! crates/hydration_core/src/services/mod.rs
//!
//! The three core services. Each one is a thin, stateless facade over the
//! `HydrationStore` port: every operation is a single request/response with
//! no in-core caching, locking or retries.

pub mod dashboard;
pub mod goal;
pub mod ledger;

pub use dashboard::DashboardAggregator;
pub use goal::GoalManager;
pub use ledger::IntakeLedger;
