//! Per-stage configuration: projection, matcher, path enumeration

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use super::validation::Validatable;

/// Graph projection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectionConfig {
    /// Largest collection a pairwise edge predicate may run over (1..=100000).
    /// The predicate is evaluated O(N²) times.
    pub max_pairwise_nodes: usize,

    /// Add sibling chain edges by default
    #[serde(default)]
    pub include_siblings: bool,
}

impl ProjectionConfig {
    pub fn from_preset(preset: Preset) -> Self {
        let max_pairwise_nodes = match preset {
            Preset::Fast => 512,
            Preset::Balanced => 2048,
            Preset::Thorough => 8192,
        };
        Self {
            max_pairwise_nodes,
            include_siblings: false,
        }
    }

    pub fn max_pairwise_nodes(mut self, n: usize) -> Self {
        self.max_pairwise_nodes = n;
        self
    }

    pub fn include_siblings(mut self, enabled: bool) -> Self {
        self.include_siblings = enabled;
        self
    }
}

impl Validatable for ProjectionConfig {
    fn validate(&self) -> ConfigResult<()> {
        ConfigError::check_range(
            "projection.max_pairwise_nodes",
            self.max_pairwise_nodes,
            1,
            100_000,
            "Pairwise predicates are quadratic; bound the collection instead",
        )
    }

    fn config_name(&self) -> &'static str {
        "ProjectionConfig"
    }
}

/// Subgraph matcher settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatcherConfig {
    /// Search-state budget (1..=1000000000). `None` searches exhaustively.
    pub max_states: Option<usize>,

    /// Reject candidates whose degree is smaller than the pattern node's
    pub degree_lookahead: bool,

    /// Require induced embeddings (no extra target edges between mapped nodes)
    #[serde(default)]
    pub induced: bool,

    /// Split the root search level across the rayon pool
    pub parallel: bool,
}

impl MatcherConfig {
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Fast => Self {
                max_states: Some(100_000),
                degree_lookahead: true,
                induced: false,
                parallel: false,
            },
            Preset::Balanced => Self {
                max_states: Some(1_000_000),
                degree_lookahead: true,
                induced: false,
                parallel: true,
            },
            Preset::Thorough => Self {
                max_states: None,
                degree_lookahead: true,
                induced: false,
                parallel: true,
            },
        }
    }

    pub fn max_states(mut self, budget: Option<usize>) -> Self {
        self.max_states = budget;
        self
    }

    pub fn degree_lookahead(mut self, enabled: bool) -> Self {
        self.degree_lookahead = enabled;
        self
    }

    pub fn induced(mut self, enabled: bool) -> Self {
        self.induced = enabled;
        self
    }

    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }
}

impl Validatable for MatcherConfig {
    fn validate(&self) -> ConfigResult<()> {
        if let Some(budget) = self.max_states {
            ConfigError::check_range(
                "matcher.max_states",
                budget,
                1,
                1_000_000_000,
                "Use null for an exhaustive search",
            )?;
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "MatcherConfig"
    }
}

/// Simple-path enumeration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathConfig {
    /// Maximum path length in edges (1..=10000)
    pub max_depth: usize,

    /// Maximum number of paths before enumeration fails (1..=1000000)
    pub max_paths: usize,
}

impl PathConfig {
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Fast => Self {
                max_depth: 16,
                max_paths: 100,
            },
            Preset::Balanced => Self {
                max_depth: 64,
                max_paths: 1_000,
            },
            Preset::Thorough => Self {
                max_depth: 256,
                max_paths: 100_000,
            },
        }
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn max_paths(mut self, paths: usize) -> Self {
        self.max_paths = paths;
        self
    }
}

impl Validatable for PathConfig {
    fn validate(&self) -> ConfigResult<()> {
        ConfigError::check_range(
            "paths.max_depth",
            self.max_depth,
            1,
            10_000,
            "Path enumeration is exponential in depth",
        )?;
        ConfigError::check_range(
            "paths.max_paths",
            self.max_paths,
            1,
            1_000_000,
            "Raise the budget gradually",
        )
    }

    fn config_name(&self) -> &'static str {
        "PathConfig"
    }
}
