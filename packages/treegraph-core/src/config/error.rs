//! Configuration error types

use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Range validation error
    #[error("Invalid range for field '{field}': {value} not in {min}..={max}. {hint}")]
    Range {
        field: String,
        value: String,
        min: String,
        max: String,
        hint: String,
    },

    /// Unsupported version
    #[error("Unsupported configuration version {found}. Supported versions: {}", supported.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", "))]
    UnsupportedVersion { found: u32, supported: Vec<u32> },

    /// Unknown preset name
    #[error("Unknown preset '{0}'. Valid presets: fast, balanced, thorough")]
    UnknownPreset(String),

    /// Environment override could not be parsed
    #[error("Invalid value '{value}' for environment variable {var}: {reason}")]
    InvalidEnv {
        var: String,
        value: String,
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    /// Create a range error with a hint
    pub fn range_with_hint(
        field: impl Into<String>,
        value: impl ToString,
        min: impl ToString,
        max: impl ToString,
        hint: impl Into<String>,
    ) -> Self {
        Self::Range {
            field: field.into(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
            hint: hint.into(),
        }
    }

    /// Check `value` against an inclusive range
    pub fn check_range(
        field: &str,
        value: usize,
        min: usize,
        max: usize,
        hint: &str,
    ) -> ConfigResult<()> {
        if (min..=max).contains(&value) {
            Ok(())
        } else {
            Err(Self::range_with_hint(field, value, min, max, hint))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_error_message() {
        let err = ConfigError::range_with_hint("paths.max_depth", 0, 1, 10000, "Use at least 1");
        assert_eq!(
            err.to_string(),
            "Invalid range for field 'paths.max_depth': 0 not in 1..=10000. Use at least 1"
        );
    }

    #[test]
    fn test_check_range() {
        assert!(ConfigError::check_range("x", 5, 1, 10, "").is_ok());
        assert!(ConfigError::check_range("x", 0, 1, 10, "").is_err());
        assert!(ConfigError::check_range("x", 11, 1, 10, "").is_err());
    }

    #[test]
    fn test_unsupported_version_message() {
        let err = ConfigError::UnsupportedVersion {
            found: 3,
            supported: vec![1],
        };
        assert!(err.to_string().contains("Supported versions: 1"));
    }
}
