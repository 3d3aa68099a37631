use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::category::{CategoryRow, CategorySummary};

/// Validated category fields, ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFields {
    pub name: String,
    pub color: Option<String>,
    pub icon: Option<String>,
}

fn duplicate_name(name: &str) -> String {
    format!("A category named '{name}' already exists")
}

pub async fn list_category_rows(pool: &PgPool, user_id: Uuid) -> Result<Vec<CategoryRow>, AppError> {
    Ok(
        sqlx::query_as::<_, CategoryRow>("SELECT * FROM categories WHERE user_id = $1 ORDER BY name")
            .bind(user_id)
            .fetch_all(pool)
            .await?,
    )
}

/// Categories with the number of templates filed under each.
pub async fn list_categories(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<CategorySummary>, AppError> {
    Ok(sqlx::query_as::<_, CategorySummary>(
        r#"
        SELECT c.*, COUNT(t.id) AS template_count
        FROM categories c
        LEFT JOIN templates t ON t.category_id = c.id
        WHERE c.user_id = $1
        GROUP BY c.id
        ORDER BY c.name
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

pub async fn get_category(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<CategoryRow, AppError> {
    sqlx::query_as::<_, CategoryRow>("SELECT * FROM categories WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category {id} not found")))
}

pub async fn insert_category(
    pool: &PgPool,
    user_id: Uuid,
    fields: &CategoryFields,
) -> Result<CategoryRow, AppError> {
    let row = sqlx::query_as::<_, CategoryRow>(
        r#"
        INSERT INTO categories (id, user_id, name, color, icon)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&fields.name)
    .bind(&fields.color)
    .bind(&fields.icon)
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, duplicate_name(&fields.name)))?;

    info!("Created category '{}' for user {user_id}", row.name);
    Ok(row)
}

pub async fn update_category(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
    fields: &CategoryFields,
) -> Result<CategoryRow, AppError> {
    sqlx::query_as::<_, CategoryRow>(
        r#"
        UPDATE categories SET name = $3, color = $4, icon = $5
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(&fields.name)
    .bind(&fields.color)
    .bind(&fields.icon)
    .fetch_optional(pool)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, duplicate_name(&fields.name)))?
    .ok_or_else(|| AppError::NotFound(format!("Category {id} not found")))
}

/// Deletes a category. Its templates become uncategorized (FK `ON DELETE SET NULL`).
pub async fn delete_category(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Category {id} not found")));
    }
    info!("Deleted category {id} for user {user_id}");
    Ok(())
}
