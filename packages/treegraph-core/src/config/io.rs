//! Configuration I/O (YAML/Env loading)
//!
//! Defines the YAML schema types. Loading and export live on `QueryConfig`.

use serde::{Deserialize, Deserializer, Serialize};

use super::stage_configs::{MatcherConfig, PathConfig, ProjectionConfig};

/// Environment variable overriding `matcher.max_states` (`none` disables the budget)
pub const ENV_MAX_STATES: &str = "TREEGRAPH_MAX_STATES";
/// Environment variable overriding `paths.max_paths`
pub const ENV_MAX_PATHS: &str = "TREEGRAPH_MAX_PATHS";
/// Environment variable overriding `projection.max_pairwise_nodes`
pub const ENV_MAX_PAIRWISE_NODES: &str = "TREEGRAPH_MAX_PAIRWISE_NODES";

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigExportV1 {
    /// Schema version (always 1 for v1)
    pub version: u32,

    /// Base preset
    pub preset: String,

    /// Fine-grained overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<ConfigOverrides>,
}

/// Configuration overrides
///
/// Every field is optional; a missing field keeps the preset's value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projection: Option<ProjectionOverrides>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matcher: Option<MatcherOverrides>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paths: Option<PathOverrides>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectionOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pairwise_nodes: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_siblings: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatcherOverrides {
    /// Absent keeps the preset budget; `null` searches exhaustively
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_states: Option<Option<usize>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree_lookahead: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub induced: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_paths: Option<usize>,
}

// A present key (even `null`) becomes `Some`; only an absent key hits `default`.
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl ProjectionOverrides {
    pub fn apply(&self, config: &mut ProjectionConfig) {
        if let Some(n) = self.max_pairwise_nodes {
            config.max_pairwise_nodes = n;
        }
        if let Some(enabled) = self.include_siblings {
            config.include_siblings = enabled;
        }
    }
}

impl From<&ProjectionConfig> for ProjectionOverrides {
    fn from(config: &ProjectionConfig) -> Self {
        Self {
            max_pairwise_nodes: Some(config.max_pairwise_nodes),
            include_siblings: Some(config.include_siblings),
        }
    }
}

impl MatcherOverrides {
    pub fn apply(&self, config: &mut MatcherConfig) {
        if let Some(budget) = self.max_states {
            config.max_states = budget;
        }
        if let Some(enabled) = self.degree_lookahead {
            config.degree_lookahead = enabled;
        }
        if let Some(enabled) = self.induced {
            config.induced = enabled;
        }
        if let Some(enabled) = self.parallel {
            config.parallel = enabled;
        }
    }
}

impl From<&MatcherConfig> for MatcherOverrides {
    fn from(config: &MatcherConfig) -> Self {
        Self {
            max_states: Some(config.max_states),
            degree_lookahead: Some(config.degree_lookahead),
            induced: Some(config.induced),
            parallel: Some(config.parallel),
        }
    }
}

impl PathOverrides {
    pub fn apply(&self, config: &mut PathConfig) {
        if let Some(depth) = self.max_depth {
            config.max_depth = depth;
        }
        if let Some(paths) = self.max_paths {
            config.max_paths = paths;
        }
    }
}

impl From<&PathConfig> for PathOverrides {
    fn from(config: &PathConfig) -> Self {
        Self {
            max_depth: Some(config.max_depth),
            max_paths: Some(config.max_paths),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::error::ConfigError;
    use crate::config::{Preset, QueryConfig};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_yaml_roundtrip() {
        let config = QueryConfig::preset(Preset::Balanced).paths(|c| c.max_depth(50));

        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("version: 1"));
        assert!(yaml.contains("preset: balanced"));
        assert!(yaml.contains("max_depth: 50"));

        let reloaded = QueryConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_yaml_loading() {
        let yaml_content = r#"
version: 1
preset: fast
overrides:
  matcher:
    max_states: null
    degree_lookahead: false
    induced: true
    parallel: false
  paths:
    max_depth: 8
    max_paths: 10
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml_content.as_bytes()).unwrap();

        let config = QueryConfig::from_yaml(temp_file.path()).unwrap();
        assert_eq!(config.get_preset(), Preset::Fast);
        assert_eq!(config.matcher_config().max_states, None);
        assert!(config.matcher_config().induced);
        assert_eq!(config.path_limits().max_depth, 8);
        // untouched stages keep preset values
        assert_eq!(config.projection_config().max_pairwise_nodes, 512);
    }

    #[test]
    fn test_yaml_partial_override_merges_onto_preset() {
        let yaml_content = r#"
version: 1
preset: balanced
overrides:
  projection:
    include_siblings: true
  matcher:
    induced: true
  paths:
    max_paths: 7
"#;
        let config = QueryConfig::from_yaml_str(yaml_content).unwrap();
        let preset = QueryConfig::preset(Preset::Balanced);

        assert!(config.projection_config().include_siblings);
        assert_eq!(
            config.projection_config().max_pairwise_nodes,
            preset.projection_config().max_pairwise_nodes
        );
        assert!(config.matcher_config().induced);
        assert_eq!(config.matcher_config().max_states, Some(1_000_000));
        assert!(config.matcher_config().parallel);
        assert_eq!(config.path_limits().max_paths, 7);
        assert_eq!(config.path_limits().max_depth, 64);
    }

    #[test]
    fn test_yaml_null_budget_differs_from_absent() {
        let explicit = "version: 1\npreset: fast\noverrides:\n  matcher:\n    max_states: null\n";
        let config = QueryConfig::from_yaml_str(explicit).unwrap();
        assert_eq!(config.matcher_config().max_states, None);

        let absent = "version: 1\npreset: fast\noverrides:\n  matcher:\n    parallel: true\n";
        let config = QueryConfig::from_yaml_str(absent).unwrap();
        assert_eq!(config.matcher_config().max_states, Some(100_000));
        assert!(config.matcher_config().parallel);
    }

    #[test]
    fn test_yaml_missing_version() {
        let result = QueryConfig::from_yaml_str("preset: fast\n");
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_yaml_unsupported_version() {
        let result = QueryConfig::from_yaml_str("version: 2\npreset: fast\n");
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::UnsupportedVersion { .. }
        ));
    }

    #[test]
    fn test_yaml_unknown_field_rejected() {
        let result = QueryConfig::from_yaml_str("version: 1\npreset: fast\nturbo: true\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_yaml_unknown_preset() {
        let result = QueryConfig::from_yaml_str("version: 1\npreset: ludicrous\n");
        assert!(matches!(result, Err(ConfigError::UnknownPreset(_))));
    }

    #[test]
    fn test_yaml_invalid_override_rejected() {
        let yaml_content = r#"
version: 1
preset: fast
overrides:
  paths:
    max_depth: 0
    max_paths: 10
"#;
        let result = QueryConfig::from_yaml_str(yaml_content);
        assert!(matches!(result, Err(ConfigError::Range { .. })));
    }
}
