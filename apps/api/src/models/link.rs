use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShortLinkRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub code: String,
    pub target_url: String,
    pub template_id: Option<Uuid>,
    pub click_count: i32,
    pub created_at: DateTime<Utc>,
}
