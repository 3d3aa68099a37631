use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::template::TemplateRow;
use crate::templates::draft::TemplateDraft;

/// Filters for listing a user's templates. `None` means "don't filter".
#[derive(Debug, Default)]
pub struct TemplateFilter {
    pub category_id: Option<Uuid>,
    pub tag_id: Option<Uuid>,
    pub favorite: Option<bool>,
    pub search: Option<String>,
}

/// Escapes LIKE wildcards and wraps the term for a substring match.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

pub async fn list_templates(
    pool: &PgPool,
    user_id: Uuid,
    filter: &TemplateFilter,
) -> Result<Vec<TemplateRow>, AppError> {
    let search = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(like_pattern);

    Ok(sqlx::query_as::<_, TemplateRow>(
        r#"
        SELECT * FROM templates
        WHERE user_id = $1
          AND ($2::uuid IS NULL OR category_id = $2)
          AND ($3::uuid IS NULL OR $3 = ANY(tag_ids))
          AND ($4::bool IS NULL OR is_favorite = $4)
          AND ($5::text IS NULL OR title ILIKE $5 OR content ILIKE $5)
        ORDER BY is_favorite DESC, updated_at DESC
        "#,
    )
    .bind(user_id)
    .bind(filter.category_id)
    .bind(filter.tag_id)
    .bind(filter.favorite)
    .bind(search)
    .fetch_all(pool)
    .await?)
}

pub async fn get_template(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<TemplateRow, AppError> {
    sqlx::query_as::<_, TemplateRow>("SELECT * FROM templates WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Template {id} not found")))
}

/// Rejects category or tag ids that don't exist or belong to another user.
async fn ensure_refs_owned(
    pool: &PgPool,
    user_id: Uuid,
    draft: &TemplateDraft,
) -> Result<(), AppError> {
    if let Some(category_id) = draft.category_id {
        let owned: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM categories WHERE id = $1 AND user_id = $2)",
        )
        .bind(category_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        if !owned {
            return Err(AppError::Validation(format!(
                "category {category_id} does not exist"
            )));
        }
    }

    if !draft.tag_ids.is_empty() {
        let found: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM tags WHERE id = ANY($1) AND user_id = $2")
                .bind(&draft.tag_ids)
                .bind(user_id)
                .fetch_one(pool)
                .await?;
        if found as usize != draft.tag_ids.len() {
            return Err(AppError::Validation(
                "tag_ids contains unknown tags".to_string(),
            ));
        }
    }

    Ok(())
}

pub async fn insert_template(
    pool: &PgPool,
    user_id: Uuid,
    draft: &TemplateDraft,
) -> Result<TemplateRow, AppError> {
    ensure_refs_owned(pool, user_id, draft).await?;

    let row = sqlx::query_as::<_, TemplateRow>(
        r#"
        INSERT INTO templates
            (id, user_id, title, content, description, category_id, tag_ids, variables, is_favorite)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&draft.title)
    .bind(&draft.content)
    .bind(&draft.description)
    .bind(draft.category_id)
    .bind(&draft.tag_ids)
    .bind(Json(&draft.variables))
    .bind(draft.is_favorite)
    .fetch_one(pool)
    .await?;

    info!(
        "Created template {} for user {user_id} with {} variables",
        row.id,
        draft.variables.len()
    );
    Ok(row)
}

pub async fn update_template(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
    draft: &TemplateDraft,
) -> Result<TemplateRow, AppError> {
    ensure_refs_owned(pool, user_id, draft).await?;

    let row = sqlx::query_as::<_, TemplateRow>(
        r#"
        UPDATE templates
        SET title = $3, content = $4, description = $5, category_id = $6,
            tag_ids = $7, variables = $8, is_favorite = $9, updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(&draft.title)
    .bind(&draft.content)
    .bind(&draft.description)
    .bind(draft.category_id)
    .bind(&draft.tag_ids)
    .bind(Json(&draft.variables))
    .bind(draft.is_favorite)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Template {id} not found")))?;

    info!("Updated template {id} for user {user_id}");
    Ok(row)
}

pub async fn set_favorite(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
    is_favorite: bool,
) -> Result<TemplateRow, AppError> {
    sqlx::query_as::<_, TemplateRow>(
        r#"
        UPDATE templates SET is_favorite = $3, updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(is_favorite)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Template {id} not found")))
}

pub async fn delete_template(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM templates WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Template {id} not found")));
    }
    info!("Deleted template {id} for user {user_id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_wraps_term() {
        assert_eq!(like_pattern("recruiter"), "%recruiter%");
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("100%_done\\"), "%100\\%\\_done\\\\%");
    }
}
