use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::tag::{TagRow, TagSummary};

fn duplicate_name(name: &str) -> String {
    format!("A tag named '{name}' already exists")
}

pub async fn list_tags(pool: &PgPool, user_id: Uuid) -> Result<Vec<TagSummary>, AppError> {
    Ok(sqlx::query_as::<_, TagSummary>(
        r#"
        SELECT g.*, COUNT(t.id) AS template_count
        FROM tags g
        LEFT JOIN templates t ON g.id = ANY(t.tag_ids)
        WHERE g.user_id = $1
        GROUP BY g.id
        ORDER BY g.name
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

pub async fn get_tag(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<TagRow, AppError> {
    sqlx::query_as::<_, TagRow>("SELECT * FROM tags WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tag {id} not found")))
}

pub async fn insert_tag(
    pool: &PgPool,
    user_id: Uuid,
    name: &str,
    color: Option<&str>,
) -> Result<TagRow, AppError> {
    let row = sqlx::query_as::<_, TagRow>(
        "INSERT INTO tags (id, user_id, name, color) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(name)
    .bind(color)
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, duplicate_name(name)))?;

    info!("Created tag '{}' for user {user_id}", row.name);
    Ok(row)
}

pub async fn update_tag(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
    name: &str,
    color: Option<&str>,
) -> Result<TagRow, AppError> {
    sqlx::query_as::<_, TagRow>(
        "UPDATE tags SET name = $3, color = $4 WHERE id = $1 AND user_id = $2 RETURNING *",
    )
    .bind(id)
    .bind(user_id)
    .bind(name)
    .bind(color)
    .fetch_optional(pool)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, duplicate_name(name)))?
    .ok_or_else(|| AppError::NotFound(format!("Tag {id} not found")))
}

/// Deletes a tag and detaches it from every template that carried it.
pub async fn delete_tag(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query("DELETE FROM tags WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Tag {id} not found")));
    }

    let detached = sqlx::query(
        r#"
        UPDATE templates SET tag_ids = array_remove(tag_ids, $1)
        WHERE user_id = $2 AND $1 = ANY(tag_ids)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    info!(
        "Deleted tag {id} for user {user_id}, detached from {} templates",
        detached.rows_affected()
    );
    Ok(())
}
