//! Axum route handlers for the Resumes API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::resumes::store::{
    delete_resume, get_resume, insert_resume, list_resumes, set_default_resume, update_resume,
    ResumeFields,
};
use crate::routes::UserIdQuery;
use crate::state::AppState;
use crate::validation::{
    nullable, optional_text, required_text, validate_http_url, MAX_DESCRIPTION_LEN, MAX_TITLE_LEN,
};

#[derive(Debug, Deserialize)]
pub struct CreateResumeRequest {
    pub user_id: Uuid,
    pub name: String,
    pub file_url: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateResumeRequest {
    pub user_id: Uuid,
    pub name: Option<String>,
    pub file_url: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
}

#[derive(Debug, Deserialize)]
pub struct SetDefaultRequest {
    pub user_id: Uuid,
}

impl CreateResumeRequest {
    fn validate(&self) -> Result<ResumeFields, AppError> {
        Ok(ResumeFields {
            name: required_text("name", &self.name, MAX_TITLE_LEN)?,
            file_url: validate_http_url("file_url", &self.file_url)?,
            description: optional_text(
                "description",
                self.description.as_deref(),
                MAX_DESCRIPTION_LEN,
            )?,
        })
    }
}

impl UpdateResumeRequest {
    fn merge(&self, existing: &ResumeRow) -> Result<ResumeFields, AppError> {
        Ok(ResumeFields {
            name: match &self.name {
                Some(name) => required_text("name", name, MAX_TITLE_LEN)?,
                None => existing.name.clone(),
            },
            file_url: match &self.file_url {
                Some(url) => validate_http_url("file_url", url)?,
                None => existing.file_url.clone(),
            },
            description: match &self.description {
                Some(description) => {
                    optional_text("description", description.as_deref(), MAX_DESCRIPTION_LEN)?
                }
                None => existing.description.clone(),
            },
        })
    }
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<ResumeRow>>, AppError> {
    Ok(Json(list_resumes(&state.db, params.user_id).await?))
}

/// POST /api/v1/resumes
pub async fn handle_create_resume(
    State(state): State<AppState>,
    Json(request): Json<CreateResumeRequest>,
) -> Result<(StatusCode, Json<ResumeRow>), AppError> {
    let fields = request.validate()?;
    let row = insert_resume(&state.db, request.user_id, &fields, request.is_default).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ResumeRow>, AppError> {
    Ok(Json(get_resume(&state.db, id, params.user_id).await?))
}

/// PUT /api/v1/resumes/:id
pub async fn handle_update_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateResumeRequest>,
) -> Result<Json<ResumeRow>, AppError> {
    let existing = get_resume(&state.db, id, request.user_id).await?;
    let fields = request.merge(&existing)?;
    Ok(Json(
        update_resume(&state.db, id, request.user_id, &fields).await?,
    ))
}

/// PATCH /api/v1/resumes/:id/default
pub async fn handle_set_default_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetDefaultRequest>,
) -> Result<Json<ResumeRow>, AppError> {
    Ok(Json(
        set_default_resume(&state.db, id, request.user_id).await?,
    ))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    delete_resume(&state.db, id, params.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_create_requires_http_url() {
        let request = CreateResumeRequest {
            user_id: Uuid::new_v4(),
            name: "Backend".to_string(),
            file_url: "file:///home/me/cv.pdf".to_string(),
            description: None,
            is_default: false,
        };
        assert!(matches!(request.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_update_merge_replaces_only_given_fields() {
        let now = Utc::now();
        let row = ResumeRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "General".to_string(),
            file_url: "https://files.example.com/general.pdf".to_string(),
            description: Some("One pager".to_string()),
            is_default: true,
            created_at: now,
            updated_at: now,
        };
        let request = UpdateResumeRequest {
            user_id: row.user_id,
            name: Some("General 2026".to_string()),
            file_url: None,
            description: Some(None),
        };
        let fields = request.merge(&row).unwrap();
        assert_eq!(fields.name, "General 2026");
        assert_eq!(fields.file_url, row.file_url);
        assert_eq!(fields.description, None);
    }
}
