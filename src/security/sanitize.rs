//! Credential sanitizers and password strength rules

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

pub const MIN_PASSWORD_LENGTH: usize = 8;

static UPPERCASE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]").unwrap());
static LOWERCASE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]").unwrap());
static DIGIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]").unwrap());
static SPECIAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[!@#$%^&*()_+\-=\[\]{};':"\\|,.<>/?]"#).unwrap());

/// Outcome of a password strength check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordStrength {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Trim surrounding whitespace and lowercase
pub fn sanitize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Trim surrounding whitespace; case is preserved
pub fn sanitize_password(password: &str) -> String {
    password.trim().to_string()
}

/// Check a password against the strength rules
///
/// Every rule is checked; violations are reported in a fixed order:
/// length, uppercase, lowercase, digit, special character.
pub fn validate_password_strength(password: &str) -> PasswordStrength {
    let mut errors = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.push(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        ));
    }

    if !UPPERCASE_RE.is_match(password) {
        errors.push("Password must contain at least one uppercase letter".to_string());
    }

    if !LOWERCASE_RE.is_match(password) {
        errors.push("Password must contain at least one lowercase letter".to_string());
    }

    if !DIGIT_RE.is_match(password) {
        errors.push("Password must contain at least one number".to_string());
    }

    if !SPECIAL_RE.is_match(password) {
        errors.push("Password must contain at least one special character".to_string());
    }

    PasswordStrength {
        is_valid: errors.is_empty(),
        errors,
    }
}
