use crate::utils::error::{MediaError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(MediaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(MediaError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(MediaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

/// Expand a leading `~/` into the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return Path::new(&home).join(rest);
        }
    }
    PathBuf::from(path)
}

/// Check that `path` names an existing, readable regular file and return its
/// canonical form.
pub fn validate_input_file(field_name: &str, path: &str) -> Result<PathBuf> {
    let expanded = expand_tilde(path);

    let canonical = fs::canonicalize(&expanded).map_err(|e| {
        MediaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: format!("Not an existing path: {}", e),
        }
    })?;

    if !canonical.is_file() {
        return Err(MediaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Not a regular file".to_string(),
        });
    }

    // Readability check; metadata alone does not catch permission problems.
    fs::File::open(&canonical).map_err(|e| MediaError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: path.to_string(),
        reason: format!("Not readable: {}", e),
    })?;

    Ok(canonical)
}

/// Like [`validate_input_file`] but also accepts directories.
pub fn validate_file_or_dir(field_name: &str, path: &str) -> Result<PathBuf> {
    let expanded = expand_tilde(path);

    let canonical = fs::canonicalize(&expanded).map_err(|e| {
        MediaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: format!("Not an existing path: {}", e),
        }
    })?;

    if canonical.is_dir() {
        fs::read_dir(&canonical).map_err(|e| MediaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: format!("Directory not readable: {}", e),
        })?;
        return Ok(canonical);
    }

    validate_input_file(field_name, path)
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(MediaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(MediaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MediaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(MediaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("endpoint", "https://example.com").is_ok());
        assert!(validate_url("endpoint", "http://example.com").is_ok());
        assert!(validate_url("endpoint", "").is_err());
        assert!(validate_url("endpoint", "invalid-url").is_err());
        assert!(validate_url("endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_input_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "data").unwrap();

        let result = validate_input_file("input", file.path().to_str().unwrap());
        assert!(result.is_ok());
        assert!(result.unwrap().is_absolute());

        assert!(validate_input_file("input", "/no/such/file/anywhere").is_err());
    }

    #[test]
    fn test_validate_input_file_rejects_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(validate_input_file("input", dir.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn test_validate_file_or_dir_accepts_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(validate_file_or_dir("input", dir.path().to_str().unwrap()).is_ok());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("output-dir", "out/images").is_ok());
        assert!(validate_path("output-dir", "").is_err());
        assert!(validate_path("output-dir", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("max_candidates", 1usize, 1, 10).is_ok());
        assert!(validate_range("max_candidates", 0usize, 1, 10).is_err());
        assert!(validate_range("max_candidates", 11usize, 1, 10).is_err());
    }
}
