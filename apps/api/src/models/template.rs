use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::variables::TemplateVariable;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TemplateRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub tag_ids: Vec<Uuid>,
    /// Derived from `content`; never written independently.
    pub variables: Json<Vec<TemplateVariable>>,
    pub is_favorite: bool,
    pub usage_count: i32,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
