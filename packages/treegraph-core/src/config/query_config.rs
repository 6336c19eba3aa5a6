//! Top-level query configuration
//!
//! Aggregates the per-stage configs behind a preset, with closure overrides,
//! YAML v1 import/export and environment overrides.

use std::path::Path;

use tracing::debug;

use super::error::{ConfigError, ConfigResult};
use super::io::{
    ConfigExportV1, ConfigOverrides, ENV_MAX_PAIRWISE_NODES, ENV_MAX_PATHS, ENV_MAX_STATES,
};
use super::preset::Preset;
use super::stage_configs::{MatcherConfig, PathConfig, ProjectionConfig};
use super::validation::Validatable;

/// Supported YAML schema versions
const SUPPORTED_VERSIONS: &[u32] = &[1];

/// Complete configuration for projection, matching and path enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryConfig {
    preset: Preset,
    projection: ProjectionConfig,
    matcher: MatcherConfig,
    paths: PathConfig,
}

impl QueryConfig {
    /// Start from a preset
    pub fn preset(preset: Preset) -> Self {
        Self {
            preset,
            projection: ProjectionConfig::from_preset(preset),
            matcher: MatcherConfig::from_preset(preset),
            paths: PathConfig::from_preset(preset),
        }
    }

    /// Override projection settings
    pub fn projection(mut self, f: impl FnOnce(ProjectionConfig) -> ProjectionConfig) -> Self {
        self.projection = f(self.projection);
        self
    }

    /// Override matcher settings
    pub fn matcher(mut self, f: impl FnOnce(MatcherConfig) -> MatcherConfig) -> Self {
        self.matcher = f(self.matcher);
        self
    }

    /// Override path enumeration settings
    pub fn paths(mut self, f: impl FnOnce(PathConfig) -> PathConfig) -> Self {
        self.paths = f(self.paths);
        self
    }

    /// Validate every stage and return the config
    pub fn build(self) -> ConfigResult<Self> {
        self.validate()?;
        Ok(self)
    }

    pub fn get_preset(&self) -> Preset {
        self.preset
    }

    pub fn projection_config(&self) -> &ProjectionConfig {
        &self.projection
    }

    pub fn matcher_config(&self) -> &MatcherConfig {
        &self.matcher
    }

    pub fn path_limits(&self) -> &PathConfig {
        &self.paths
    }

    /// Load from a YAML v1 file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    /// Parse a YAML v1 document
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let export: ConfigExportV1 = serde_yaml::from_str(content)?;

        if !SUPPORTED_VERSIONS.contains(&export.version) {
            return Err(ConfigError::UnsupportedVersion {
                found: export.version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let preset = Preset::from_str(&export.preset)
            .map_err(|_| ConfigError::UnknownPreset(export.preset.clone()))?;

        let mut config = Self::preset(preset);
        if let Some(overrides) = export.overrides {
            if let Some(projection) = &overrides.projection {
                projection.apply(&mut config.projection);
            }
            if let Some(matcher) = &overrides.matcher {
                matcher.apply(&mut config.matcher);
            }
            if let Some(paths) = &overrides.paths {
                paths.apply(&mut config.paths);
            }
        }

        debug!(preset = %preset, "Loaded query configuration from YAML");
        config.build()
    }

    /// Export as YAML v1
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let export = ConfigExportV1 {
            version: 1,
            preset: self.preset.to_string(),
            overrides: Some(ConfigOverrides {
                projection: Some((&self.projection).into()),
                matcher: Some((&self.matcher).into()),
                paths: Some((&self.paths).into()),
            }),
        };
        Ok(serde_yaml::to_string(&export)?)
    }

    /// Apply `TREEGRAPH_*` overrides from the process environment
    pub fn with_env_overrides(self) -> ConfigResult<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply `TREEGRAPH_*` overrides from an arbitrary lookup
    pub fn with_overrides_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ConfigResult<Self> {
        if let Some(raw) = lookup(ENV_MAX_STATES) {
            let budget = if raw.trim().eq_ignore_ascii_case("none") {
                None
            } else {
                Some(parse_env(ENV_MAX_STATES, &raw)?)
            };
            debug!(var = ENV_MAX_STATES, ?budget, "Environment override");
            self.matcher.max_states = budget;
        }
        if let Some(raw) = lookup(ENV_MAX_PATHS) {
            self.paths.max_paths = parse_env(ENV_MAX_PATHS, &raw)?;
            debug!(var = ENV_MAX_PATHS, value = self.paths.max_paths, "Environment override");
        }
        if let Some(raw) = lookup(ENV_MAX_PAIRWISE_NODES) {
            self.projection.max_pairwise_nodes = parse_env(ENV_MAX_PAIRWISE_NODES, &raw)?;
            debug!(
                var = ENV_MAX_PAIRWISE_NODES,
                value = self.projection.max_pairwise_nodes,
                "Environment override"
            );
        }
        self.build()
    }

    /// Get a human-readable description of the configuration
    pub fn describe(&self) -> String {
        let states = match self.matcher.max_states {
            Some(n) => n.to_string(),
            None => "unbounded".to_string(),
        };
        format!(
            "preset={} states={} induced={} parallel={} paths={}@{} pairwise<={}",
            self.preset,
            states,
            self.matcher.induced,
            self.matcher.parallel,
            self.paths.max_paths,
            self.paths.max_depth,
            self.projection.max_pairwise_nodes,
        )
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self::preset(Preset::default())
    }
}

impl Validatable for QueryConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.projection.validate()?;
        self.matcher.validate()?;
        self.paths.validate()
    }

    fn config_name(&self) -> &'static str {
        "QueryConfig"
    }
}

fn parse_env(var: &str, raw: &str) -> ConfigResult<usize> {
    raw.trim()
        .parse::<usize>()
        .map_err(|e| ConfigError::InvalidEnv {
            var: var.to_string(),
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_closure_overrides() {
        let config = QueryConfig::preset(Preset::Fast)
            .matcher(|c| c.induced(true).max_states(Some(42)))
            .paths(|c| c.max_paths(7))
            .build()
            .unwrap();
        assert!(config.matcher_config().induced);
        assert_eq!(config.matcher_config().max_states, Some(42));
        assert_eq!(config.path_limits().max_paths, 7);
        assert_eq!(config.path_limits().max_depth, 16);
    }

    #[test]
    fn test_build_rejects_invalid() {
        let result = QueryConfig::preset(Preset::Fast)
            .paths(|c| c.max_paths(0))
            .build();
        assert!(matches!(result, Err(ConfigError::Range { .. })));
    }

    #[test]
    fn test_env_overrides() {
        let config = QueryConfig::preset(Preset::Fast)
            .with_overrides_from(env(&[
                (ENV_MAX_STATES, "none"),
                (ENV_MAX_PATHS, "25"),
                (ENV_MAX_PAIRWISE_NODES, " 64 "),
            ]))
            .unwrap();
        assert_eq!(config.matcher_config().max_states, None);
        assert_eq!(config.path_limits().max_paths, 25);
        assert_eq!(config.projection_config().max_pairwise_nodes, 64);
    }

    #[test]
    fn test_env_override_parse_error() {
        let result =
            QueryConfig::preset(Preset::Fast).with_overrides_from(env(&[(ENV_MAX_PATHS, "many")]));
        assert!(matches!(result, Err(ConfigError::InvalidEnv { .. })));
    }

    #[test]
    fn test_env_override_range_checked() {
        let result =
            QueryConfig::preset(Preset::Fast).with_overrides_from(env(&[(ENV_MAX_STATES, "0")]));
        assert!(matches!(result, Err(ConfigError::Range { .. })));
    }

    #[test]
    fn test_describe() {
        let text = QueryConfig::preset(Preset::Thorough).describe();
        assert!(text.contains("preset=thorough"));
        assert!(text.contains("states=unbounded"));
    }
}
