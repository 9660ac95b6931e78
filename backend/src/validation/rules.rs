//! Common validation rules shared across request payloads.

use validator::ValidationError;

const PASSWORD_SPECIALS: &str = "!@#$%^&*()_+-=[]{};':\",.<>/?";

/// Validates password shape.
///
/// Requirements:
/// - 6-72 characters
/// - at least one letter and one digit
/// - only letters, digits, and the allowed special characters
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();
    if !(6..=72).contains(&len) {
        return Err(ValidationError::new("password_invalid_length"));
    }

    if !password.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::new("password_missing_letter"));
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new("password_missing_digit"));
    }

    if !password
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(c))
    {
        return Err(ValidationError::new("password_invalid_characters"));
    }

    Ok(())
}

/// Validates a 6-digit numeric verification code.
pub fn validate_verification_code(code: &str) -> Result<(), ValidationError> {
    if code.len() != 6 || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new("code_invalid"));
    }
    Ok(())
}

/// Validates a `#rrggbb` hex color label.
pub fn validate_hex_color(color: &str) -> Result<(), ValidationError> {
    let rest = color
        .strip_prefix('#')
        .ok_or_else(|| ValidationError::new("color_invalid"))?;
    if rest.len() != 6 || !rest.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ValidationError::new("color_invalid"));
    }
    Ok(())
}

/// Validates the TODO list status filter.
pub fn validate_todo_status(status: &str) -> Result<(), ValidationError> {
    match status {
        "all" | "complete" | "incomplete" => Ok(()),
        _ => Err(ValidationError::new("status_invalid")),
    }
}

/// Validates the TODO list search field selector.
pub fn validate_search_type(search_type: &str) -> Result<(), ValidationError> {
    match search_type {
        "title" | "content" => Ok(()),
        _ => Err(ValidationError::new("search_type_invalid")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_rejects_too_short() {
        assert!(validate_password("a1").is_err());
    }

    #[test]
    fn password_requires_letter_and_digit() {
        assert!(validate_password("123456").is_err());
        assert!(validate_password("abcdef").is_err());
        assert!(validate_password("abc123").is_ok());
    }

    #[test]
    fn password_allows_listed_specials_only() {
        assert!(validate_password("abc123!@#").is_ok());
        assert!(validate_password("abc123 space").is_err());
    }

    #[test]
    fn verification_code_requires_six_digits() {
        assert!(validate_verification_code("482913").is_ok());
        assert!(validate_verification_code("48291").is_err());
        assert!(validate_verification_code("48291a").is_err());
    }

    #[test]
    fn hex_color_requires_hash_and_six_hex_digits() {
        assert!(validate_hex_color("#00ff00").is_ok());
        assert!(validate_hex_color("00ff00").is_err());
        assert!(validate_hex_color("#00ff0").is_err());
        assert!(validate_hex_color("#00ff0g").is_err());
    }

    #[test]
    fn todo_status_is_a_closed_set() {
        assert!(validate_todo_status("all").is_ok());
        assert!(validate_todo_status("complete").is_ok());
        assert!(validate_todo_status("incomplete").is_ok());
        assert!(validate_todo_status("finished").is_err());
    }

    #[test]
    fn search_type_is_a_closed_set() {
        assert!(validate_search_type("title").is_ok());
        assert!(validate_search_type("content").is_ok());
        assert!(validate_search_type("color").is_err());
    }
}
