use rand::distributions::Alphanumeric;
use rand::Rng;

pub const CODE_LEN: usize = 7;
const MAX_CODE_LEN: usize = 32;

/// Random `[A-Za-z0-9]{7}` code.
pub fn generate_code() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(CODE_LEN)
        .map(char::from)
        .collect()
}

/// Cheap shape check so garbage paths never reach the cache or database.
pub fn is_valid_code(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= MAX_CODE_LEN
        && code.chars().all(|c| c.is_ascii_alphanumeric())
}

pub fn short_url(base_url: &str, code: &str) -> String {
    format!("{base_url}/s/{code}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_codes_are_valid() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), CODE_LEN);
            assert!(is_valid_code(&code));
        }
    }

    #[test]
    fn test_generated_codes_differ() {
        assert_ne!(generate_code(), generate_code());
    }

    #[test]
    fn test_invalid_codes() {
        assert!(!is_valid_code(""));
        assert!(!is_valid_code("abc-123"));
        assert!(!is_valid_code("../etc"));
        assert!(!is_valid_code(&"a".repeat(33)));
    }

    #[test]
    fn test_short_url() {
        assert_eq!(
            short_url("https://go.example.com", "Ab12345"),
            "https://go.example.com/s/Ab12345"
        );
    }
}
