//! Axum route handlers for usage logging and analytics.

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::categories::store::list_category_rows;
use crate::errors::AppError;
use crate::models::usage::UsageEventRow;
use crate::state::AppState;
use crate::usage::analytics::{
    period_start, summarize, AnalyticsSummary, DEFAULT_PERIOD_DAYS, MAX_PERIOD_DAYS,
};
use crate::usage::store::{
    recent_events, record_usage, samples_since, template_stats, NewUsageEvent,
};
use crate::validation::validate_content;

const DEFAULT_EVENT_LIMIT: i64 = 50;
const MAX_EVENT_LIMIT: i64 = 200;

#[derive(Debug, Deserialize)]
pub struct LogUsageRequest {
    pub user_id: Uuid,
    pub template_id: Option<Uuid>,
    pub filled_content: String,
    #[serde(default)]
    pub values: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct RecentUsageQuery {
    pub user_id: Uuid,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    pub user_id: Uuid,
    pub days: Option<u32>,
}

/// POST /api/v1/usage
pub async fn handle_log_usage(
    State(state): State<AppState>,
    Json(request): Json<LogUsageRequest>,
) -> Result<(StatusCode, Json<UsageEventRow>), AppError> {
    validate_content(&request.filled_content)?;

    let event = record_usage(
        &state.db,
        NewUsageEvent {
            user_id: request.user_id,
            template_id: request.template_id,
            filled_content: &request.filled_content,
            values: &request.values,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /api/v1/usage
pub async fn handle_recent_usage(
    State(state): State<AppState>,
    Query(params): Query<RecentUsageQuery>,
) -> Result<Json<Vec<UsageEventRow>>, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_EVENT_LIMIT);
    if !(1..=MAX_EVENT_LIMIT).contains(&limit) {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {MAX_EVENT_LIMIT}"
        )));
    }
    Ok(Json(recent_events(&state.db, params.user_id, limit).await?))
}

/// GET /api/v1/analytics
pub async fn handle_analytics(
    State(state): State<AppState>,
    Query(params): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsSummary>, AppError> {
    let days = params.days.unwrap_or(DEFAULT_PERIOD_DAYS);
    if !(1..=MAX_PERIOD_DAYS).contains(&days) {
        return Err(AppError::Validation(format!(
            "days must be between 1 and {MAX_PERIOD_DAYS}"
        )));
    }

    let today = Utc::now().date_naive();
    let samples = samples_since(&state.db, params.user_id, period_start(today, days)).await?;
    let templates = template_stats(&state.db, params.user_id).await?;
    let categories = list_category_rows(&state.db, params.user_id).await?;

    Ok(Json(summarize(&samples, &templates, &categories, days, today)))
}
