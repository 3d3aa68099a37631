//! Stateless preview endpoints over the variable engine.

use std::collections::HashMap;

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::validation::check_content_length;
use crate::variables::{extract_variables, fill_template, unfilled_variables, TemplateVariable};

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub variables: Vec<TemplateVariable>,
}

#[derive(Debug, Deserialize)]
pub struct FillRequest {
    pub content: String,
    #[serde(default)]
    pub values: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct FillResponse {
    pub content: String,
    pub unfilled: Vec<String>,
}

/// POST /api/v1/variables/extract
pub async fn handle_extract(
    Json(request): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, AppError> {
    check_content_length(&request.content)?;
    Ok(Json(ExtractResponse {
        variables: extract_variables(&request.content),
    }))
}

/// POST /api/v1/variables/fill
///
/// Fills without persisting anything; `unfilled` lists names still awaiting a value.
pub async fn handle_fill(Json(request): Json<FillRequest>) -> Result<Json<FillResponse>, AppError> {
    check_content_length(&request.content)?;
    let content = fill_template(&request.content, &request.values).into_owned();
    let unfilled = unfilled_variables(&request.content, &request.values);
    Ok(Json(FillResponse { content, unfilled }))
}
