//! Axum route handlers for the Categories API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::categories::store::{
    delete_category, get_category, insert_category, list_categories, update_category,
    CategoryFields,
};
use crate::errors::AppError;
use crate::models::category::{CategoryRow, CategorySummary};
use crate::routes::UserIdQuery;
use crate::state::AppState;
use crate::validation::{nullable, optional_text, required_text, validate_color, MAX_NAME_LEN};

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub user_id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub user_id: Uuid,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub color: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub icon: Option<Option<String>>,
}

impl CreateCategoryRequest {
    fn validate(&self) -> Result<CategoryFields, AppError> {
        Ok(CategoryFields {
            name: required_text("name", &self.name, MAX_NAME_LEN)?,
            color: validate_color(self.color.as_deref())?,
            icon: optional_text("icon", self.icon.as_deref(), MAX_NAME_LEN)?,
        })
    }
}

impl UpdateCategoryRequest {
    fn merge(&self, existing: &CategoryRow) -> Result<CategoryFields, AppError> {
        Ok(CategoryFields {
            name: match &self.name {
                Some(name) => required_text("name", name, MAX_NAME_LEN)?,
                None => existing.name.clone(),
            },
            color: match &self.color {
                Some(color) => validate_color(color.as_deref())?,
                None => existing.color.clone(),
            },
            icon: match &self.icon {
                Some(icon) => optional_text("icon", icon.as_deref(), MAX_NAME_LEN)?,
                None => existing.icon.clone(),
            },
        })
    }
}

/// GET /api/v1/categories
pub async fn handle_list_categories(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<CategorySummary>>, AppError> {
    Ok(Json(list_categories(&state.db, params.user_id).await?))
}

/// POST /api/v1/categories
pub async fn handle_create_category(
    State(state): State<AppState>,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<CategoryRow>), AppError> {
    let fields = request.validate()?;
    let row = insert_category(&state.db, request.user_id, &fields).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT /api/v1/categories/:id
pub async fn handle_update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCategoryRequest>,
) -> Result<Json<CategoryRow>, AppError> {
    let existing = get_category(&state.db, id, request.user_id).await?;
    let fields = request.merge(&existing)?;
    Ok(Json(
        update_category(&state.db, id, request.user_id, &fields).await?,
    ))
}

/// DELETE /api/v1/categories/:id
pub async fn handle_delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    delete_category(&state.db, id, params.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
