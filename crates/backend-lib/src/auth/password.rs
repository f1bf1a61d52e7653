// ============================
// livechat-backend-lib/src/auth/password.rs
// ============================
//! Password rules.
use crate::error::AppError;

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 4;

/// Check a new password against the minimum length, counted in characters.
pub fn validate_new_password(password: &str, min_length: usize) -> Result<(), AppError> {
    if password.chars().count() < min_length {
        return Err(AppError::BadRequest("Password is too short".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_boundary() {
        assert!(validate_new_password("", MIN_PASSWORD_LENGTH).is_err());
        assert!(validate_new_password("abc", MIN_PASSWORD_LENGTH).is_err());
        assert!(validate_new_password("abcd", MIN_PASSWORD_LENGTH).is_ok());
        assert!(validate_new_password("abcdefgh", MIN_PASSWORD_LENGTH).is_ok());
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        // 3 characters, 6 bytes
        assert!(validate_new_password("mật", MIN_PASSWORD_LENGTH).is_err());
        assert!(validate_new_password("mật1", MIN_PASSWORD_LENGTH).is_ok());
    }

    #[test]
    fn test_error_is_bad_request() {
        let err = validate_new_password("ab", 4).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
