pub mod domain;
pub mod ports;
pub mod services;

pub use domain::{
    DailySnapshot, IssuedToken, User, UserCredentials, WaterLogEntry, DEFAULT_DAILY_GOAL_ML,
    MIN_DAILY_GOAL_ML,
};
pub use ports::{Authenticator, CoreError, CoreResult, HydrationStore};
pub use services::{DashboardAggregator, GoalManager, IntakeLedger};
