pub mod auth;
pub mod middleware;
pub mod state;
pub mod water;

// Re-export the handlers the server binary wires into its router.
pub use middleware::require_auth;
pub use water::{daily_logs_handler, log_water_handler, update_goal_handler};
