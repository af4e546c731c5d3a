use crate::utils::error::{Result, StadiumError};
use std::collections::HashSet;

pub const SUPPORTED_INPUT_EXTENSIONS: &[&str] = &["csv", "json"];
pub const SUPPORTED_OUTPUT_FORMATS: &[&str] = &["csv", "json"];
pub const SUPPORTED_LOG_FORMATS: &[&str] = &["compact", "json"];

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(StadiumError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(StadiumError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(StadiumError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_file_extension(field_name: &str, file: &str, allowed_extensions: &[&str]) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();

    match std::path::Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(extension) if allowed_set.contains(extension.to_ascii_lowercase().as_str()) => Ok(()),
        Some(extension) => Err(StadiumError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                extension,
                allowed_extensions.join(", ")
            ),
        }),
        None => Err(StadiumError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        }),
    }
}

pub fn validate_one_of(field_name: &str, values: &[String], allowed: &[&str]) -> Result<()> {
    if values.is_empty() {
        return Err(StadiumError::MissingConfigError {
            field: field_name.to_string(),
        });
    }

    for value in values {
        if !allowed.contains(&value.as_str()) {
            return Err(StadiumError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: value.clone(),
                reason: format!("Valid values: {}", allowed.join(", ")),
            });
        }
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(StadiumError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("top_n", 5, 1).is_ok());
        assert!(validate_positive_number("top_n", 0, 1).is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension("input", "stadiums.csv", SUPPORTED_INPUT_EXTENSIONS).is_ok());
        assert!(validate_file_extension("input", "stadiums.JSON", SUPPORTED_INPUT_EXTENSIONS).is_ok());
        assert!(validate_file_extension("input", "stadiums.txt", SUPPORTED_INPUT_EXTENSIONS).is_err());
        assert!(validate_file_extension("input", "stadiums", SUPPORTED_INPUT_EXTENSIONS).is_err());
    }

    #[test]
    fn test_validate_one_of() {
        let formats = vec!["csv".to_string(), "json".to_string()];
        assert!(validate_one_of("formats", &formats, SUPPORTED_OUTPUT_FORMATS).is_ok());
        assert!(validate_one_of("formats", &["tsv".to_string()], SUPPORTED_OUTPUT_FORMATS).is_err());
        assert!(matches!(
            validate_one_of("formats", &[], SUPPORTED_OUTPUT_FORMATS),
            Err(StadiumError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("output_path", "./output").is_ok());
        assert!(validate_path("output_path", "").is_err());
        assert!(validate_path("output_path", "bad\0path").is_err());
    }
}
