//! Axum route handlers for short links and the public redirect.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Redirect,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::links::code::{is_valid_code, short_url};
use crate::links::store::{delete_link, insert_link, list_links, resolve_and_count};
use crate::models::link::ShortLinkRow;
use crate::routes::UserIdQuery;
use crate::state::AppState;
use crate::templates::store::get_template;
use crate::validation::validate_http_url;

#[derive(Debug, Deserialize)]
pub struct CreateLinkRequest {
    pub user_id: Uuid,
    pub url: String,
    pub template_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ShortLinkResponse {
    #[serde(flatten)]
    pub link: ShortLinkRow,
    pub short_url: String,
}

impl ShortLinkResponse {
    fn new(link: ShortLinkRow, base_url: &str) -> Self {
        let short_url = short_url(base_url, &link.code);
        ShortLinkResponse { link, short_url }
    }
}

/// POST /api/v1/links
pub async fn handle_create_link(
    State(state): State<AppState>,
    Json(request): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<ShortLinkResponse>), AppError> {
    let target_url = validate_http_url("url", &request.url)?;
    if let Some(template_id) = request.template_id {
        get_template(&state.db, template_id, request.user_id).await?;
    }

    let link = insert_link(&state.db, request.user_id, &target_url, request.template_id).await?;
    state.link_cache.put(&link.code, &link.target_url).await;

    Ok((
        StatusCode::CREATED,
        Json(ShortLinkResponse::new(link, &state.config.public_base_url)),
    ))
}

/// GET /api/v1/links
pub async fn handle_list_links(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<ShortLinkResponse>>, AppError> {
    let links = list_links(&state.db, params.user_id).await?;
    Ok(Json(
        links
            .into_iter()
            .map(|link| ShortLinkResponse::new(link, &state.config.public_base_url))
            .collect(),
    ))
}

/// DELETE /api/v1/links/:id
pub async fn handle_delete_link(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    let code = delete_link(&state.db, id, params.user_id).await?;
    state.link_cache.evict(&code).await;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /s/:code
///
/// Cache hits redirect immediately and count the click in the background.
pub async fn handle_redirect(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Redirect, AppError> {
    if !is_valid_code(&code) {
        return Err(AppError::NotFound(format!("Link {code} not found")));
    }

    if let Some(target) = state.link_cache.get(&code).await {
        let db = state.db.clone();
        tokio::spawn(async move {
            if let Err(e) = resolve_and_count(&db, &code).await {
                warn!("Failed to count click for {code}: {e}");
            }
        });
        return Ok(Redirect::temporary(&target));
    }

    let target = resolve_and_count(&state.db, &code)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Link {code} not found")))?;
    state.link_cache.put(&code, &target).await;
    Ok(Redirect::temporary(&target))
}
