//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use rand::Rng;

/// Length of the code embedded in shareable links
pub const SHARE_CODE_LENGTH: usize = 10;

/// Calculate pagination offset from a 1-based page
pub fn calculate_offset(page: u32, page_size: u32) -> i64 {
    i64::from(page.saturating_sub(1)) * i64::from(page_size)
}

/// Normalize whitespace in text
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Generate the code for a new shareable link
pub fn generate_share_code() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                            abcdefghijklmnopqrstuvwxyz\
                            0123456789";
    let mut rng = rand::thread_rng();

    (0..SHARE_CODE_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Join a path onto a base URL, tolerating a trailing slash on the base
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Escape `%` and `_` so user input is matched literally inside ILIKE patterns
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', r"\\")
        .replace('%', r"\%")
        .replace('_', r"\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_offset() {
        assert_eq!(calculate_offset(1, 20), 0);
        assert_eq!(calculate_offset(3, 20), 40);
        assert_eq!(calculate_offset(0, 20), 0);
    }

    #[test]
    fn test_share_code_shape() {
        let code = generate_share_code();
        assert_eq!(code.len(), SHARE_CODE_LENGTH);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("http://host/", "/s/abc"), "http://host/s/abc");
        assert_eq!(join_url("http://host", "s/abc"), "http://host/s/abc");
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off"), r"50\%\_off");
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  spring   fair \n"), "spring fair");
    }
}
