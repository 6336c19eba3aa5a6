//! Configuration validation

use super::error::ConfigResult;

/// Trait for validatable configuration objects
///
/// # Example
/// ```rust,ignore
/// use treegraph_core::config::Validatable;
///
/// fn checked<C: Validatable>(config: C) -> Result<C, ConfigError> {
///     config.validate()?;
///     Ok(config)
/// }
/// ```
pub trait Validatable {
    /// Returns `Ok(())` if valid, `Err(ConfigError)` with details if invalid.
    fn validate(&self) -> ConfigResult<()>;

    /// Configuration name for error messages
    fn config_name(&self) -> &'static str {
        "Config"
    }
}

/// Extension trait for validating collections of configs
pub trait ValidatableCollection {
    fn validate_all(&self) -> ConfigResult<()>;
}

impl<T: Validatable> ValidatableCollection for Vec<T> {
    fn validate_all(&self) -> ConfigResult<()> {
        for config in self {
            config.validate()?;
        }
        Ok(())
    }
}

impl<T: Validatable> ValidatableCollection for Option<T> {
    fn validate_all(&self) -> ConfigResult<()> {
        if let Some(config) = self {
            config.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PathConfig, Preset};

    #[test]
    fn test_validate_collections() {
        let configs = vec![
            PathConfig::from_preset(Preset::Fast),
            PathConfig::from_preset(Preset::Thorough),
        ];
        assert!(configs.validate_all().is_ok());

        let broken = Some(PathConfig::from_preset(Preset::Fast).max_paths(0));
        assert!(broken.validate_all().is_err());

        let none: Option<PathConfig> = None;
        assert!(none.validate_all().is_ok());
    }
}
