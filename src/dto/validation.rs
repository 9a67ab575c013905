//! Validation helpers for DTOs.

use validator::ValidationError;

/// Maximum accepted length for a theme display name.
pub const THEME_NAME_MAX_LEN: usize = 100;
/// Maximum accepted length for a jam slug.
pub const JAM_SLUG_MAX_LEN: usize = 64;

/// Validates that a jam slug is 1 to 64 lowercase alphanumeric or hyphen
/// characters.
///
/// # Examples
///
/// ```ignore
/// validate_jam_slug("spring-jam-2026") // Ok
/// validate_jam_slug("Spring Jam")      // Err - uppercase and space
/// validate_jam_slug("")                // Err - empty
/// ```
pub fn validate_jam_slug(slug: &str) -> Result<(), ValidationError> {
    if slug.is_empty() || slug.len() > JAM_SLUG_MAX_LEN {
        let mut err = ValidationError::new("jam_slug_length");
        err.message = Some(
            format!(
                "Jam slug must be 1 to {} characters (got {})",
                JAM_SLUG_MAX_LEN,
                slug.len()
            )
            .into(),
        );
        return Err(err);
    }

    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        let mut err = ValidationError::new("jam_slug_format");
        err.message =
            Some("Jam slug must contain only lowercase alphanumeric characters or hyphens".into());
        return Err(err);
    }

    Ok(())
}

/// Validates a single theme name: non-blank after trimming and at most
/// [`THEME_NAME_MAX_LEN`] characters.
pub fn validate_theme_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("theme_name_blank");
        err.message = Some("Theme name must not be blank".into());
        return Err(err);
    }

    if name.chars().count() > THEME_NAME_MAX_LEN {
        let mut err = ValidationError::new("theme_name_length");
        err.message =
            Some(format!("Theme name must be at most {THEME_NAME_MAX_LEN} characters").into());
        return Err(err);
    }

    Ok(())
}

/// Validates a proposed theme list: every name passes [`validate_theme_name`]
/// and no two names collide case-insensitively after trimming.
pub fn validate_theme_names(names: &[String]) -> Result<(), ValidationError> {
    let mut seen = std::collections::HashSet::new();
    for name in names {
        validate_theme_name(name)?;

        if !seen.insert(name.trim().to_lowercase()) {
            let mut err = ValidationError::new("theme_name_duplicate");
            err.message = Some(format!("Duplicate theme name in request: {name}").into());
            return Err(err);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_jam_slug_valid() {
        assert!(validate_jam_slug("spring-jam-2026").is_ok());
        assert!(validate_jam_slug("j").is_ok());
        assert!(validate_jam_slug("2026").is_ok());
    }

    #[test]
    fn test_validate_jam_slug_invalid() {
        assert!(validate_jam_slug("").is_err()); // empty
        assert!(validate_jam_slug("Spring-Jam").is_err()); // uppercase
        assert!(validate_jam_slug("spring jam").is_err()); // space
        assert!(validate_jam_slug("jam_2026").is_err()); // underscore
        assert!(validate_jam_slug(&"a".repeat(65)).is_err()); // too long
    }

    #[test]
    fn test_validate_theme_name_valid() {
        assert!(validate_theme_name("Retro").is_ok());
        assert!(validate_theme_name("  padded  ").is_ok()); // trimmed later
        assert!(validate_theme_name(&"a".repeat(100)).is_ok());
    }

    #[test]
    fn test_validate_theme_name_invalid() {
        assert!(validate_theme_name("").is_err()); // empty
        assert!(validate_theme_name("   ").is_err()); // blank
        assert!(validate_theme_name(&"a".repeat(101)).is_err()); // too long
    }

    #[test]
    fn test_validate_theme_names_rejects_case_insensitive_duplicates() {
        let names = vec!["Retro".to_string(), "retro".to_string()];
        assert!(validate_theme_names(&names).is_err());

        let names = vec!["Retro".to_string(), " Retro ".to_string()];
        assert!(validate_theme_names(&names).is_err());

        let names = vec!["Retro".to_string(), "Space".to_string()];
        assert!(validate_theme_names(&names).is_ok());
    }
}
