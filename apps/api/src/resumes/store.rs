use sqlx::{PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeRow;

#[derive(Debug, Clone, PartialEq)]
pub struct ResumeFields {
    pub name: String,
    pub file_url: String,
    pub description: Option<String>,
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Resume {id} not found"))
}

/// Default resume first, then newest.
pub async fn list_resumes(pool: &PgPool, user_id: Uuid) -> Result<Vec<ResumeRow>, AppError> {
    Ok(sqlx::query_as::<_, ResumeRow>(
        "SELECT * FROM resumes WHERE user_id = $1 ORDER BY is_default DESC, created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

pub async fn get_resume(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<ResumeRow, AppError> {
    sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| not_found(id))
}

async fn clear_default(conn: &mut PgConnection, user_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE resumes SET is_default = FALSE WHERE user_id = $1 AND is_default")
        .bind(user_id)
        .execute(conn)
        .await?;
    Ok(())
}

/// Inserts a resume. It becomes the default when asked to, or when it is the user's first.
pub async fn insert_resume(
    pool: &PgPool,
    user_id: Uuid,
    fields: &ResumeFields,
    is_default: bool,
) -> Result<ResumeRow, AppError> {
    let mut tx = pool.begin().await?;

    let has_any: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM resumes WHERE user_id = $1)")
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;
    let is_default = is_default || !has_any;
    if is_default {
        clear_default(&mut tx, user_id).await?;
    }

    let row = sqlx::query_as::<_, ResumeRow>(
        r#"
        INSERT INTO resumes (id, user_id, name, file_url, description, is_default)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&fields.name)
    .bind(&fields.file_url)
    .bind(&fields.description)
    .bind(is_default)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    info!("Created resume {} for user {user_id} (default: {is_default})", row.id);
    Ok(row)
}

pub async fn update_resume(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
    fields: &ResumeFields,
) -> Result<ResumeRow, AppError> {
    sqlx::query_as::<_, ResumeRow>(
        r#"
        UPDATE resumes SET name = $3, file_url = $4, description = $5, updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(&fields.name)
    .bind(&fields.file_url)
    .bind(&fields.description)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| not_found(id))
}

/// Makes `id` the user's only default resume.
pub async fn set_default_resume(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
) -> Result<ResumeRow, AppError> {
    let mut tx = pool.begin().await?;
    clear_default(&mut tx, user_id).await?;

    let row = sqlx::query_as::<_, ResumeRow>(
        r#"
        UPDATE resumes SET is_default = TRUE, updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| not_found(id))?;

    tx.commit().await?;
    info!("Resume {id} is now the default for user {user_id}");
    Ok(row)
}

/// Deletes a resume. If it was the default, the newest remaining resume inherits the flag.
pub async fn delete_resume(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let was_default: bool = sqlx::query_scalar(
        "DELETE FROM resumes WHERE id = $1 AND user_id = $2 RETURNING is_default",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| not_found(id))?;

    if was_default {
        sqlx::query(
            r#"
            UPDATE resumes SET is_default = TRUE, updated_at = NOW()
            WHERE id = (
                SELECT id FROM resumes WHERE user_id = $1 ORDER BY created_at DESC LIMIT 1
            )
            "#,
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    info!("Deleted resume {id} for user {user_id}");
    Ok(())
}
