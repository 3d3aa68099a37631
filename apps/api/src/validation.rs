//! Boundary validators shared by the request handlers.
//! Each returns `AppError::Validation` with a message naming the offending field.

use serde::{Deserialize, Deserializer};

use crate::errors::AppError;

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_CONTENT_LEN: usize = 20_000;
pub const MAX_NAME_LEN: usize = 50;
pub const MAX_DESCRIPTION_LEN: usize = 1_000;

/// Trims `value` and checks it is non-empty and at most `max` characters.
pub fn required_text(field: &str, value: &str, max: usize) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    if trimmed.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Optional free text: blank collapses to `None`, otherwise trimmed and length-checked.
pub fn optional_text(
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, AppError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => required_text(field, v, max).map(Some),
    }
}

pub fn check_content_length(content: &str) -> Result<(), AppError> {
    if content.chars().count() > MAX_CONTENT_LEN {
        return Err(AppError::Validation(format!(
            "content must be at most {MAX_CONTENT_LEN} characters"
        )));
    }
    Ok(())
}

/// Template content must contain something besides whitespace. It is stored untrimmed.
pub fn validate_content(content: &str) -> Result<(), AppError> {
    if content.trim().is_empty() {
        return Err(AppError::Validation("content cannot be empty".to_string()));
    }
    check_content_length(content)
}

/// Accepts `#RRGGBB`; returns the color lowercased.
pub fn validate_color(color: Option<&str>) -> Result<Option<String>, AppError> {
    let Some(color) = color.map(str::trim).filter(|c| !c.is_empty()) else {
        return Ok(None);
    };
    let hex = color.strip_prefix('#').unwrap_or_default();
    if color.len() != 7 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AppError::Validation(format!(
            "color '{color}' must be a hex value like #1a2b3c"
        )));
    }
    Ok(Some(color.to_ascii_lowercase()))
}

/// Requires an absolute http(s) URL with a host.
pub fn validate_http_url(field: &str, raw: &str) -> Result<String, AppError> {
    let raw = raw.trim();
    let parsed = url::Url::parse(raw)
        .map_err(|e| AppError::Validation(format!("{field} is not a valid URL: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(AppError::Validation(format!(
            "{field} must be an http or https URL"
        )));
    }
    Ok(parsed.to_string())
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`) in PATCH-style bodies.
/// Use with `#[serde(default, deserialize_with = "nullable")]`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text_trims() {
        assert_eq!(required_text("title", "  Hello ", 10).unwrap(), "Hello");
    }

    #[test]
    fn test_required_text_rejects_blank_and_long() {
        assert!(matches!(
            required_text("title", "   ", 10),
            Err(AppError::Validation(_))
        ));
        assert!(required_text("title", "abcdefghijk", 10).is_err());
        // multi-byte characters count once
        assert!(required_text("title", "ééééé", 5).is_ok());
    }

    #[test]
    fn test_optional_text_blank_is_none() {
        assert_eq!(optional_text("d", Some("  "), 10).unwrap(), None);
        assert_eq!(optional_text("d", None, 10).unwrap(), None);
        assert_eq!(optional_text("d", Some(" x "), 10).unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn test_validate_content() {
        assert!(validate_content("Hi {{name}}").is_ok());
        assert!(validate_content(" \n ").is_err());
        assert!(validate_content(&"a".repeat(MAX_CONTENT_LEN + 1)).is_err());
        assert!(check_content_length("").is_ok());
    }

    #[test]
    fn test_validate_color() {
        assert_eq!(validate_color(Some("#A1B2C3")).unwrap().as_deref(), Some("#a1b2c3"));
        assert_eq!(validate_color(None).unwrap(), None);
        assert_eq!(validate_color(Some("")).unwrap(), None);
        assert!(validate_color(Some("red")).is_err());
        assert!(validate_color(Some("#12345")).is_err());
        assert!(validate_color(Some("#12345g")).is_err());
    }

    #[test]
    fn test_validate_http_url() {
        assert_eq!(
            validate_http_url("url", " https://example.com/jobs?id=1 ").unwrap(),
            "https://example.com/jobs?id=1"
        );
        assert!(validate_http_url("url", "ftp://example.com").is_err());
        assert!(validate_http_url("url", "javascript:alert(1)").is_err());
        assert!(validate_http_url("url", "/relative/path").is_err());
    }

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "nullable")]
        category_id: Option<Option<uuid::Uuid>>,
    }

    #[test]
    fn test_nullable_distinguishes_absent_and_null() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.category_id, None);

        let null: Patch = serde_json::from_str(r#"{"category_id": null}"#).unwrap();
        assert_eq!(null.category_id, Some(None));

        let id = uuid::Uuid::new_v4();
        let set: Patch = serde_json::from_str(&format!(r#"{{"category_id": "{id}"}}"#)).unwrap();
        assert_eq!(set.category_id, Some(Some(id)));
    }
}
