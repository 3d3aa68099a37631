use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::links::code::generate_code;
use crate::models::link::ShortLinkRow;

const MAX_CODE_ATTEMPTS: usize = 5;

/// Inserts a link under a fresh random code, retrying on the rare collision.
pub async fn insert_link(
    pool: &PgPool,
    user_id: Uuid,
    target_url: &str,
    template_id: Option<Uuid>,
) -> Result<ShortLinkRow, AppError> {
    for attempt in 1..=MAX_CODE_ATTEMPTS {
        let code = generate_code();
        let result = sqlx::query_as::<_, ShortLinkRow>(
            r#"
            INSERT INTO short_links (id, user_id, code, target_url, template_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&code)
        .bind(target_url)
        .bind(template_id)
        .fetch_one(pool)
        .await;

        match result {
            Ok(row) => {
                info!("Issued short link {} for user {user_id}", row.code);
                return Ok(row);
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                warn!("Short code collision on attempt {attempt}, retrying");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(AppError::Internal(anyhow::anyhow!(
        "could not allocate a unique short code after {MAX_CODE_ATTEMPTS} attempts"
    )))
}

pub async fn list_links(pool: &PgPool, user_id: Uuid) -> Result<Vec<ShortLinkRow>, AppError> {
    Ok(sqlx::query_as::<_, ShortLinkRow>(
        "SELECT * FROM short_links WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

/// Deletes a link and returns its code so the caller can evict it from the cache.
pub async fn delete_link(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<String, AppError> {
    let code: String =
        sqlx::query_scalar("DELETE FROM short_links WHERE id = $1 AND user_id = $2 RETURNING code")
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Link {id} not found")))?;
    info!("Deleted short link {code} for user {user_id}");
    Ok(code)
}

/// Counts a click and returns the target, or `None` for an unknown code.
pub async fn resolve_and_count(pool: &PgPool, code: &str) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar(
        "UPDATE short_links SET click_count = click_count + 1 WHERE code = $1 RETURNING target_url",
    )
    .bind(code)
    .fetch_optional(pool)
    .await
}
