//! Axum route handlers for the Tags API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::tag::{TagRow, TagSummary};
use crate::routes::UserIdQuery;
use crate::state::AppState;
use crate::tags::store::{delete_tag, get_tag, insert_tag, list_tags, update_tag};
use crate::validation::{nullable, required_text, validate_color, MAX_NAME_LEN};

#[derive(Debug, Deserialize)]
pub struct CreateTagRequest {
    pub user_id: Uuid,
    pub name: String,
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTagRequest {
    pub user_id: Uuid,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub color: Option<Option<String>>,
}

/// GET /api/v1/tags
pub async fn handle_list_tags(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<TagSummary>>, AppError> {
    Ok(Json(list_tags(&state.db, params.user_id).await?))
}

/// POST /api/v1/tags
pub async fn handle_create_tag(
    State(state): State<AppState>,
    Json(request): Json<CreateTagRequest>,
) -> Result<(StatusCode, Json<TagRow>), AppError> {
    let name = required_text("name", &request.name, MAX_NAME_LEN)?;
    let color = validate_color(request.color.as_deref())?;
    let row = insert_tag(&state.db, request.user_id, &name, color.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT /api/v1/tags/:id
pub async fn handle_update_tag(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTagRequest>,
) -> Result<Json<TagRow>, AppError> {
    let existing = get_tag(&state.db, id, request.user_id).await?;
    let name = match &request.name {
        Some(name) => required_text("name", name, MAX_NAME_LEN)?,
        None => existing.name,
    };
    let color = match &request.color {
        Some(color) => validate_color(color.as_deref())?,
        None => existing.color,
    };
    Ok(Json(
        update_tag(&state.db, id, request.user_id, &name, color.as_deref()).await?,
    ))
}

/// DELETE /api/v1/tags/:id
pub async fn handle_delete_tag(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    delete_tag(&state.db, id, params.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
