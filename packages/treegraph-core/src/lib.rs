/*
 * Treegraph Core - structural queries over immutable syntax trees
 *
 * Feature-First Architecture:
 * - shared/      : Node arena, kinds, structural identity
 * - features/    : parsing → query_engine → graph_projection → pattern_matching / graph_analytics
 * - config/      : Presets and budgets (YAML + env overrides)
 *
 * Performance:
 * - Lazy predicate chains, materialized once
 * - Rayon fan-out in the subgraph matcher
 */

// Crate-level lint configuration
#![allow(clippy::type_complexity)] // Callback aliases are spelled out
#![allow(clippy::new_without_default)] // Builders take required arguments
#![allow(clippy::should_implement_trait)] // from_str naming intentional
#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::needless_range_loop)] // Range loop for indexing

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models: syntax tree arena, kinds, identity
pub mod shared;

/// Feature modules
pub mod features;

/// Configuration system (presets, YAML, env overrides)
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{Preset, QueryConfig};
pub use errors::{CallbackError, CallbackResult, Result, TreegraphError};
pub use features::graph_analytics::{CentralityMetric, GraphAnalyzer, GraphMetrics, PathLimits};
pub use features::graph_projection::{Graph, GraphProjection, ProjectionOptions};
pub use features::parsing::{parse_python, SourceParser, TreeSitterParser};
pub use features::pattern_matching::{find_pattern_matches, Match, MatchOptions, SubgraphMatcher};
pub use features::query_engine::{DispatchTable, NodeCollection, Predicate};
pub use shared::models::{KindRegistry, NodeKind, SyntaxNode, SyntaxTree};
