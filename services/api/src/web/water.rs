//! services/api/src/web/water.rs
//!
//! Contains the Axum handlers for the water-tracking REST endpoints and the
//! master definition for the OpenAPI specification.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};
use uuid::Uuid;

use crate::error::core_error_response;
use crate::web::state::AppState;
use hydration_core::domain::WaterLogEntry;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    paths(
        crate::web::auth::register_handler,
        crate::web::auth::login_handler,
        crate::web::auth::logout_handler,
        log_water_handler,
        daily_logs_handler,
        update_goal_handler,
    ),
    components(schemas(
        crate::web::auth::RegisterRequest,
        crate::web::auth::LoginRequest,
        crate::web::auth::AuthResponse,
        crate::web::auth::UserPayload,
        crate::web::auth::LogoutResponse,
        LogWaterRequest,
        WaterLogResponse,
        DailyLogsResponse,
        UpdateGoalRequest,
        UpdateGoalResponse,
    )),
    tags(
        (name = "Water Tracker API", description = "API endpoints for logging water intake and tracking the daily goal.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Request and Response Structs
//=========================================================================================

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogWaterRequest {
    /// Amount of water consumed, in milliliters.
    pub amount: i32,
    /// When the water was consumed; defaults to the server clock.
    pub occurred_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WaterLogResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount_ml: i32,
    pub occurred_at: DateTime<Utc>,
}

impl From<WaterLogEntry> for WaterLogResponse {
    fn from(entry: WaterLogEntry) -> Self {
        Self {
            id: entry.id,
            user_id: entry.user_id,
            amount_ml: entry.amount_ml,
            occurred_at: entry.occurred_at,
        }
    }
}

/// The "today" view: chronological logs, their total, the active goal and
/// the progress ratio clamped to 1.0.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyLogsResponse {
    pub logs: Vec<WaterLogResponse>,
    pub total_intake: i64,
    pub daily_goal: i32,
    pub progress_ratio: f64,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGoalRequest {
    /// The new daily goal in milliliters; must be at least 100.
    pub new_goal: i32,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGoalResponse {
    pub message: String,
    pub daily_goal: i32,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// POST /water/log - Record one intake event
#[utoipa::path(
    post,
    path = "/water/log",
    request_body = LogWaterRequest,
    responses(
        (status = 201, description = "Intake logged", body = WaterLogResponse),
        (status = 400, description = "Amount below 1 ml"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Unknown user")
    ),
    security(("bearer_token" = []))
)]
pub async fn log_water_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<LogWaterRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let entry = state
        .ledger
        .log_intake(user_id, req.amount, req.occurred_at, Utc::now())
        .await
        .map_err(|e| {
            error!("Failed to log intake for {}: {:?}", user_id, e);
            core_error_response(e)
        })?;

    Ok((StatusCode::CREATED, Json(WaterLogResponse::from(entry))))
}

/// GET /water/daily - Today's logs, total and goal progress
#[utoipa::path(
    get,
    path = "/water/daily",
    responses(
        (status = 200, description = "Today's snapshot", body = DailyLogsResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Unknown user")
    ),
    security(("bearer_token" = []))
)]
pub async fn daily_logs_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let snapshot = state
        .dashboard
        .daily_snapshot(user_id, Utc::now())
        .await
        .map_err(|e| {
            error!("Failed to build daily snapshot for {}: {:?}", user_id, e);
            core_error_response(e)
        })?;

    let response = DailyLogsResponse {
        logs: snapshot
            .entries
            .into_iter()
            .map(WaterLogResponse::from)
            .collect(),
        total_intake: snapshot.total_intake_ml,
        daily_goal: snapshot.daily_goal_ml,
        progress_ratio: snapshot.progress_ratio,
    };
    Ok((StatusCode::OK, Json(response)))
}

/// PUT /water/goal - Change the daily goal
#[utoipa::path(
    put,
    path = "/water/goal",
    request_body = UpdateGoalRequest,
    responses(
        (status = 200, description = "Goal updated", body = UpdateGoalResponse),
        (status = 400, description = "Goal below 100 ml"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Unknown user")
    ),
    security(("bearer_token" = []))
)]
pub async fn update_goal_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<UpdateGoalRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let daily_goal = state
        .goals
        .set_goal(user_id, req.new_goal)
        .await
        .map_err(|e| {
            error!("Failed to update goal for {}: {:?}", user_id, e);
            core_error_response(e)
        })?;

    Ok((
        StatusCode::OK,
        Json(UpdateGoalResponse {
            message: "Daily goal updated successfully".to_string(),
            daily_goal,
        }),
    ))
}
