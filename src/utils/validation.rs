use crate::utils::error::{EtlError, Result};
use std::collections::HashSet;
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// Each input must be either an existing directory or a file with one of
/// the allowed extensions (compared case-insensitively).
pub fn validate_input_paths(
    field_name: &str,
    inputs: &[String],
    allowed_extensions: &[&str],
) -> Result<()> {
    if inputs.is_empty() {
        return Err(EtlError::MissingConfigError {
            field: field_name.to_string(),
        });
    }

    let allowed_set: HashSet<String> = allowed_extensions
        .iter()
        .map(|ext| ext.to_ascii_lowercase())
        .collect();

    for input in inputs {
        validate_path(field_name, input)?;

        let path = Path::new(input);
        if path.is_dir() {
            continue;
        }

        match path.extension().and_then(|ext| ext.to_str()) {
            Some(extension) if allowed_set.contains(&extension.to_ascii_lowercase()) => {}
            Some(extension) => {
                return Err(EtlError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: input.clone(),
                    reason: format!(
                        "Unsupported file extension: {}. Allowed extensions: {}",
                        extension,
                        allowed_extensions.join(", ")
                    ),
                });
            }
            None => {
                return Err(EtlError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: input.clone(),
                    reason: "File has no extension and is not a directory".to_string(),
                });
            }
        }
    }

    Ok(())
}

pub fn validate_output_filename(field_name: &str, filename: &str, extension: &str) -> Result<()> {
    validate_non_empty_string(field_name, filename)?;

    if filename.contains('/') || filename.contains('\\') {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: filename.to_string(),
            reason: "Must be a bare file name, not a path".to_string(),
        });
    }

    let matches = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(extension))
        .unwrap_or(false);
    if !matches {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: filename.to_string(),
            reason: format!("File name must end in .{}", extension),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}
