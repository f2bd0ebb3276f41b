// validation.rs - Input format checks for user payloads

use once_cell::sync::Lazy;
use regex::Regex;

/// Longest email the `users.email` column can hold.
pub const MAX_EMAIL_LENGTH: usize = 255;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z\s\-'.]+$").expect("valid name regex"));

/// Basic `local@domain.tld` check. Not RFC 5321.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// 2-100 characters of letters, whitespace, hyphens, apostrophes and periods.
pub fn is_valid_name(name: &str) -> bool {
    let len = name.chars().count();
    if !(2..=100).contains(&len) {
        return false;
    }
    NAME_RE.is_match(name)
}

/// Trim and collapse internal whitespace runs to single spaces.
pub fn sanitize_string(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Validate a name/email pair for create and update.
///
/// Returns every problem found, name first, so the client can fix both
/// fields in one round trip. An empty vec means the input is acceptable.
pub fn validate_user_input(name: &str, email: &str) -> Vec<String> {
    let mut errors = Vec::new();

    if name.is_empty() {
        errors.push("Name is required".to_string());
    } else if !is_valid_name(name) {
        errors.push(
            "Name must be 2-100 characters and contain only letters, spaces, hyphens, apostrophes, and periods"
                .to_string(),
        );
    }

    if email.is_empty() {
        errors.push("Email is required".to_string());
    } else if email.chars().count() > MAX_EMAIL_LENGTH {
        errors.push(format!("Email must be at most {} characters", MAX_EMAIL_LENGTH));
    } else if !is_valid_email(email) {
        errors.push("Email format is invalid".to_string());
    }

    errors
}
