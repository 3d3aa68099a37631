//! Axum route handlers for the Templates API.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::template::TemplateRow;
use crate::resumes::store::list_resumes;
use crate::routes::UserIdQuery;
use crate::state::AppState;
use crate::templates::compose::{needs_resumes, resolve_values};
use crate::templates::draft::{CreateTemplateRequest, TemplateDraft, UpdateTemplateRequest};
use crate::templates::store::{
    delete_template, get_template, insert_template, list_templates, set_favorite,
    update_template, TemplateFilter,
};
use crate::usage::store::{record_usage, NewUsageEvent};
use crate::variables::{fill_template, unfilled_variables};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListTemplatesQuery {
    pub user_id: Uuid,
    pub category_id: Option<Uuid>,
    pub tag_id: Option<Uuid>,
    pub favorite: Option<bool>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FavoriteRequest {
    pub user_id: Uuid,
    pub is_favorite: bool,
}

#[derive(Debug, Deserialize)]
pub struct DuplicateRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ComposeRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub values: HashMap<String, String>,
    #[serde(default)]
    pub log_usage: bool,
}

#[derive(Debug, Serialize)]
pub struct ComposeResponse {
    pub content: String,
    pub unfilled: Vec<String>,
    pub usage_event_id: Option<Uuid>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/templates
pub async fn handle_list_templates(
    State(state): State<AppState>,
    Query(params): Query<ListTemplatesQuery>,
) -> Result<Json<Vec<TemplateRow>>, AppError> {
    let filter = TemplateFilter {
        category_id: params.category_id,
        tag_id: params.tag_id,
        favorite: params.favorite,
        search: params.search,
    };
    Ok(Json(list_templates(&state.db, params.user_id, &filter).await?))
}

/// POST /api/v1/templates
pub async fn handle_create_template(
    State(state): State<AppState>,
    Json(request): Json<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<TemplateRow>), AppError> {
    let draft = TemplateDraft::from_create(&request)?;
    let row = insert_template(&state.db, request.user_id, &draft).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/templates/:id
pub async fn handle_get_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<TemplateRow>, AppError> {
    Ok(Json(get_template(&state.db, id, params.user_id).await?))
}

/// PUT /api/v1/templates/:id
///
/// Partial update. Variables are regenerated only when `content` changes.
pub async fn handle_update_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTemplateRequest>,
) -> Result<Json<TemplateRow>, AppError> {
    let existing = get_template(&state.db, id, request.user_id).await?;
    let draft = TemplateDraft::from_update(&existing, &request)?;
    Ok(Json(
        update_template(&state.db, id, request.user_id, &draft).await?,
    ))
}

/// DELETE /api/v1/templates/:id
pub async fn handle_delete_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    delete_template(&state.db, id, params.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/templates/:id/duplicate
pub async fn handle_duplicate_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<DuplicateRequest>,
) -> Result<(StatusCode, Json<TemplateRow>), AppError> {
    let existing = get_template(&state.db, id, request.user_id).await?;
    let draft = TemplateDraft::duplicate_of(&existing);
    let row = insert_template(&state.db, request.user_id, &draft).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PATCH /api/v1/templates/:id/favorite
pub async fn handle_set_favorite(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<FavoriteRequest>,
) -> Result<Json<TemplateRow>, AppError> {
    Ok(Json(
        set_favorite(&state.db, id, request.user_id, request.is_favorite).await?,
    ))
}

/// POST /api/v1/templates/:id/compose
///
/// Fills the stored template with caller values, directive defaults and resume
/// links. Optionally records the result as a usage event.
pub async fn handle_compose(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ComposeRequest>,
) -> Result<Json<ComposeResponse>, AppError> {
    let template = get_template(&state.db, id, request.user_id).await?;
    let variables = &template.variables.0;

    let resumes = if needs_resumes(variables) {
        list_resumes(&state.db, request.user_id).await?
    } else {
        Vec::new()
    };

    let values = resolve_values(variables, &request.values, &resumes);
    let content = fill_template(&template.content, &values).into_owned();
    let unfilled = unfilled_variables(&template.content, &values);

    let usage_event_id = if request.log_usage {
        let event = record_usage(
            &state.db,
            NewUsageEvent {
                user_id: request.user_id,
                template_id: Some(template.id),
                filled_content: &content,
                values: &values,
            },
        )
        .await?;
        Some(event.id)
    } else {
        None
    };

    Ok(Json(ComposeResponse {
        content,
        unfilled,
        usage_event_id,
    }))
}
