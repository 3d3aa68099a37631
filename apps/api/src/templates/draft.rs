//! Validated template payloads, ready to persist.
//!
//! This is the only place variables are derived: a draft built from a create
//! request always extracts them, and an update re-extracts them only when the
//! content actually changed.

use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::template::TemplateRow;
use crate::validation::{
    nullable, optional_text, required_text, validate_content, MAX_DESCRIPTION_LEN, MAX_TITLE_LEN,
};
use crate::variables::{extract_variables, TemplateVariable};

#[derive(Debug, Deserialize)]
pub struct CreateTemplateRequest {
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
    #[serde(default)]
    pub is_favorite: bool,
}

/// Partial update. Absent fields keep their value; `null` clears nullable ones.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTemplateRequest {
    pub user_id: Uuid,
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub category_id: Option<Option<Uuid>>,
    pub tag_ids: Option<Vec<Uuid>>,
    pub is_favorite: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateDraft {
    pub title: String,
    pub content: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub tag_ids: Vec<Uuid>,
    pub is_favorite: bool,
    pub variables: Vec<TemplateVariable>,
}

impl TemplateDraft {
    pub fn from_create(request: &CreateTemplateRequest) -> Result<Self, AppError> {
        validate_content(&request.content)?;
        Ok(TemplateDraft {
            title: required_text("title", &request.title, MAX_TITLE_LEN)?,
            description: optional_text(
                "description",
                request.description.as_deref(),
                MAX_DESCRIPTION_LEN,
            )?,
            variables: extract_variables(&request.content),
            content: request.content.clone(),
            category_id: request.category_id,
            tag_ids: dedup_ids(&request.tag_ids),
            is_favorite: request.is_favorite,
        })
    }

    /// Merges `request` over `existing`.
    pub fn from_update(
        existing: &TemplateRow,
        request: &UpdateTemplateRequest,
    ) -> Result<Self, AppError> {
        let title = match &request.title {
            Some(title) => required_text("title", title, MAX_TITLE_LEN)?,
            None => existing.title.clone(),
        };

        let (content, variables) = match &request.content {
            Some(content) if *content != existing.content => {
                validate_content(content)?;
                (content.clone(), extract_variables(content))
            }
            _ => (existing.content.clone(), existing.variables.0.clone()),
        };

        let description = match &request.description {
            Some(description) => {
                optional_text("description", description.as_deref(), MAX_DESCRIPTION_LEN)?
            }
            None => existing.description.clone(),
        };

        Ok(TemplateDraft {
            title,
            content,
            description,
            category_id: request.category_id.unwrap_or(existing.category_id),
            tag_ids: request
                .tag_ids
                .as_deref()
                .map(dedup_ids)
                .unwrap_or_else(|| existing.tag_ids.clone()),
            is_favorite: request.is_favorite.unwrap_or(existing.is_favorite),
            variables,
        })
    }

    /// A fresh copy of an existing template: new title, favorite flag cleared.
    pub fn duplicate_of(existing: &TemplateRow) -> Self {
        let mut title = format!("{} (Copy)", existing.title);
        if title.chars().count() > MAX_TITLE_LEN {
            title = title.chars().take(MAX_TITLE_LEN).collect();
        }
        TemplateDraft {
            title,
            content: existing.content.clone(),
            description: existing.description.clone(),
            category_id: existing.category_id,
            tag_ids: existing.tag_ids.clone(),
            is_favorite: false,
            variables: extract_variables(&existing.content),
        }
    }
}

fn dedup_ids(ids: &[Uuid]) -> Vec<Uuid> {
    let mut out: Vec<Uuid> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(id) {
            out.push(*id);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sqlx::types::Json;

    fn existing(content: &str) -> TemplateRow {
        let now = Utc::now();
        TemplateRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Cold intro".to_string(),
            content: content.to_string(),
            description: Some("For recruiters".to_string()),
            category_id: Some(Uuid::new_v4()),
            tag_ids: vec![Uuid::new_v4()],
            variables: Json(extract_variables(content)),
            is_favorite: true,
            usage_count: 3,
            last_used_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn update(user_id: Uuid) -> UpdateTemplateRequest {
        UpdateTemplateRequest {
            user_id,
            ..Default::default()
        }
    }

    #[test]
    fn test_create_extracts_variables() {
        let request = CreateTemplateRequest {
            user_id: Uuid::new_v4(),
            title: "  Referral ask ".to_string(),
            content: "Hi {{name}}, any openings at {{company|your team}}?".to_string(),
            description: Some("   ".to_string()),
            category_id: None,
            tag_ids: vec![],
            is_favorite: false,
        };
        let draft = TemplateDraft::from_create(&request).unwrap();
        assert_eq!(draft.title, "Referral ask");
        assert_eq!(draft.description, None);
        assert_eq!(draft.variables.len(), 2);
        assert!(!draft.variables[1].is_required);
    }

    #[test]
    fn test_create_rejects_empty_content() {
        let request = CreateTemplateRequest {
            user_id: Uuid::new_v4(),
            title: "Empty".to_string(),
            content: "   ".to_string(),
            description: None,
            category_id: None,
            tag_ids: vec![],
            is_favorite: false,
        };
        assert!(matches!(
            TemplateDraft::from_create(&request),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_update_without_content_keeps_variables() {
        let row = existing("Hello {{name}}");
        let mut req = update(row.user_id);
        req.title = Some("Warm intro".to_string());
        let draft = TemplateDraft::from_update(&row, &req).unwrap();
        assert_eq!(draft.title, "Warm intro");
        assert_eq!(draft.content, row.content);
        assert_eq!(draft.variables, row.variables.0);
        assert_eq!(draft.category_id, row.category_id);
        assert!(draft.is_favorite);
    }

    #[test]
    fn test_update_with_new_content_regenerates_variables() {
        let row = existing("Hello {{name}}");
        let mut req = update(row.user_id);
        req.content = Some("Dear {{hiringManager}}, see {{portfolioUrl}}".to_string());
        let draft = TemplateDraft::from_update(&row, &req).unwrap();
        let names: Vec<_> = draft.variables.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["hiringManager", "portfolioUrl"]);
    }

    #[test]
    fn test_update_with_stale_variables_and_same_content_keeps_stored_list() {
        let mut row = existing("Hello {{name}}");
        row.variables = Json(vec![]);
        let mut req = update(row.user_id);
        req.content = Some(row.content.clone());
        let draft = TemplateDraft::from_update(&row, &req).unwrap();
        assert!(draft.variables.is_empty());
    }

    #[test]
    fn test_update_null_clears_nullable_fields() {
        let row = existing("Hello {{name}}");
        let mut req = update(row.user_id);
        req.category_id = Some(None);
        req.description = Some(None);
        let draft = TemplateDraft::from_update(&row, &req).unwrap();
        assert_eq!(draft.category_id, None);
        assert_eq!(draft.description, None);
    }

    #[test]
    fn test_update_tag_ids_are_deduplicated() {
        let row = existing("Hello");
        let tag = Uuid::new_v4();
        let mut req = update(row.user_id);
        req.tag_ids = Some(vec![tag, tag]);
        let draft = TemplateDraft::from_update(&row, &req).unwrap();
        assert_eq!(draft.tag_ids, vec![tag]);
    }

    #[test]
    fn test_duplicate_resets_favorite() {
        let row = existing("Hello {{name}}");
        let copy = TemplateDraft::duplicate_of(&row);
        assert_eq!(copy.title, "Cold intro (Copy)");
        assert!(!copy.is_favorite);
        assert_eq!(copy.variables.len(), 1);
    }

    #[test]
    fn test_duplicate_title_is_capped() {
        let mut row = existing("Hello");
        row.title = "x".repeat(MAX_TITLE_LEN);
        let copy = TemplateDraft::duplicate_of(&row);
        assert_eq!(copy.title.chars().count(), MAX_TITLE_LEN);
    }
}
