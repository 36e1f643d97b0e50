//! Validation helpers for DTOs.

use validator::ValidationError;

/// Validates a player username: trimmed, non-empty, at most 32 characters.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    validate_name(username, 32, "username")
}

/// Validates a team name: trimmed, non-empty, at most 64 characters.
pub fn validate_team_name(name: &str) -> Result<(), ValidationError> {
    validate_name(name, 64, "team_name")
}

fn validate_name(value: &str, max_len: usize, code: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new(code);
        err.message = Some("must not be empty or whitespace".into());
        return Err(err);
    }

    if value.chars().count() > max_len {
        let mut err = ValidationError::new(code);
        err.message = Some(format!("must be at most {max_len} characters").into());
        return Err(err);
    }

    if value != value.trim() {
        let mut err = ValidationError::new(code);
        err.message = Some("must not have leading or trailing whitespace".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_reasonable_names() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("Röd Ledare").is_ok());
        assert!(validate_team_name("Team Red").is_ok());
    }

    #[test]
    fn rejects_empty_and_whitespace() {
        assert!(validate_username("").is_err());
        assert!(validate_username("   ").is_err());
        assert!(validate_username(" alice").is_err());
        assert!(validate_team_name("team ").is_err());
    }

    #[test]
    fn rejects_over_length() {
        assert!(validate_username(&"x".repeat(33)).is_err());
        assert!(validate_team_name(&"x".repeat(64)).is_ok());
        assert!(validate_team_name(&"x".repeat(65)).is_err());
    }
}
