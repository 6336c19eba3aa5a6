//! Query configuration
//!
//! Three tiers, most users only need the first:
//! - Level 1: Preset - one-liner
//! - Level 2: Stage override - adjust a single budget with a closure
//! - Level 3: YAML / environment - complete control
//!
//! # Examples
//!
//! ```rust,ignore
//! use treegraph_core::config::{Preset, QueryConfig};
//!
//! // Level 1
//! let config = QueryConfig::preset(Preset::Fast).build()?;
//!
//! // Level 2
//! let config = QueryConfig::preset(Preset::Balanced)
//!     .matcher(|c| c.max_states(Some(50_000)).induced(true))
//!     .build()?;
//!
//! // Level 3
//! let config = QueryConfig::from_yaml("queries.yaml")?.with_env_overrides()?;
//! ```

pub mod error;
pub mod io;
pub mod preset;
pub mod query_config;
pub mod stage_configs;
pub mod validation;

// Re-exports
pub use error::{ConfigError, ConfigResult};
pub use io::{
    ConfigExportV1, ConfigOverrides, MatcherOverrides, PathOverrides, ProjectionOverrides,
    ENV_MAX_PAIRWISE_NODES, ENV_MAX_PATHS, ENV_MAX_STATES,
};
pub use preset::Preset;
pub use query_config::QueryConfig;
pub use stage_configs::{MatcherConfig, PathConfig, ProjectionConfig};
pub use validation::{Validatable, ValidatableCollection};
