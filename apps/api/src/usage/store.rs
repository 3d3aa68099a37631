use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::usage::UsageEventRow;

pub struct NewUsageEvent<'a> {
    pub user_id: Uuid,
    pub template_id: Option<Uuid>,
    pub filled_content: &'a str,
    pub values: &'a HashMap<String, String>,
}

/// Records a usage event and bumps the template's counters in one transaction.
/// Fails with `NotFound` (and writes nothing) if the template isn't the user's.
pub async fn record_usage(
    pool: &PgPool,
    event: NewUsageEvent<'_>,
) -> Result<UsageEventRow, AppError> {
    let mut tx = pool.begin().await?;

    if let Some(template_id) = event.template_id {
        let updated = sqlx::query(
            r#"
            UPDATE templates
            SET usage_count = usage_count + 1, last_used_at = NOW()
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(template_id)
        .bind(event.user_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Template {template_id} not found"
            )));
        }
    }

    let row = sqlx::query_as::<_, UsageEventRow>(
        r#"
        INSERT INTO usage_events (id, user_id, template_id, filled_content, variable_values)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(event.user_id)
    .bind(event.template_id)
    .bind(event.filled_content)
    .bind(Json(event.values))
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    info!(
        "Recorded usage event {} for user {} (template {:?})",
        row.id, event.user_id, event.template_id
    );
    Ok(row)
}

pub async fn recent_events(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<UsageEventRow>, AppError> {
    Ok(sqlx::query_as::<_, UsageEventRow>(
        "SELECT * FROM usage_events WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?)
}

/// Timestamp and template of one usage event — all the analytics need.
#[derive(Debug, Clone, FromRow)]
pub struct UsageSample {
    pub template_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

pub async fn samples_since(
    pool: &PgPool,
    user_id: Uuid,
    since: DateTime<Utc>,
) -> Result<Vec<UsageSample>, AppError> {
    Ok(sqlx::query_as::<_, UsageSample>(
        "SELECT template_id, created_at FROM usage_events WHERE user_id = $1 AND created_at >= $2",
    )
    .bind(user_id)
    .bind(since)
    .fetch_all(pool)
    .await?)
}

/// Per-template fields the analytics summary groups by.
#[derive(Debug, Clone, FromRow)]
pub struct TemplateStat {
    pub id: Uuid,
    pub title: String,
    pub category_id: Option<Uuid>,
    pub is_favorite: bool,
    pub usage_count: i32,
}

pub async fn template_stats(pool: &PgPool, user_id: Uuid) -> Result<Vec<TemplateStat>, AppError> {
    Ok(sqlx::query_as::<_, TemplateStat>(
        "SELECT id, title, category_id, is_favorite, usage_count FROM templates WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}
