//! Match results and search options

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::MatcherConfig;
use crate::errors::CallbackResult;
use crate::features::graph_projection::{EdgeWeight, NodeWeight};

/// Decides whether a pattern node may map onto a target node
pub type NodeMatcher = Arc<dyn Fn(&NodeWeight, &NodeWeight) -> CallbackResult<bool> + Send + Sync>;

/// Decides whether a pattern edge may map onto a target edge
pub type EdgeMatcher = Arc<dyn Fn(&EdgeWeight, &EdgeWeight) -> CallbackResult<bool> + Send + Sync>;

/// One embedding of the pattern: `targets[p]` is the target node for pattern
/// node `p`.
///
/// Ordering is lexicographic over `targets`, i.e. by (pattern index, target
/// index), which is the canonical order of matcher results.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Match {
    targets: Vec<usize>,
}

impl Match {
    pub fn new(targets: Vec<usize>) -> Self {
        Self { targets }
    }

    /// Target node for a pattern node
    pub fn target(&self, pattern_index: usize) -> Option<usize> {
        self.targets.get(pattern_index).copied()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// `(pattern, target)` pairs in pattern order
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.targets.iter().copied().enumerate()
    }

    pub fn targets(&self) -> &[usize] {
        &self.targets
    }

    pub fn to_map(&self) -> BTreeMap<usize, usize> {
        self.pairs().collect()
    }
}

/// Search options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOptions {
    /// Stop after the first embedding
    pub first_only: bool,
    /// Forbid target edges between mapped nodes that the pattern lacks
    pub induced: bool,
    /// Reject candidates whose degree is below the pattern node's
    pub degree_lookahead: bool,
    /// Candidate evaluations allowed before `ResourceExhausted`
    pub max_states: Option<usize>,
    /// Split the root search level across the rayon pool
    pub parallel: bool,
}

impl MatchOptions {
    pub fn first_only(mut self, enabled: bool) -> Self {
        self.first_only = enabled;
        self
    }

    pub fn induced(mut self, enabled: bool) -> Self {
        self.induced = enabled;
        self
    }

    pub fn degree_lookahead(mut self, enabled: bool) -> Self {
        self.degree_lookahead = enabled;
        self
    }

    pub fn max_states(mut self, budget: Option<usize>) -> Self {
        self.max_states = budget;
        self
    }

    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            first_only: false,
            induced: false,
            degree_lookahead: true,
            max_states: None,
            parallel: false,
        }
    }
}

impl From<&MatcherConfig> for MatchOptions {
    fn from(config: &MatcherConfig) -> Self {
        Self {
            first_only: false,
            induced: config.induced,
            degree_lookahead: config.degree_lookahead,
            max_states: config.max_states,
            parallel: config.parallel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preset;

    #[test]
    fn test_canonical_order() {
        let mut matches = vec![Match::new(vec![1, 2]), Match::new(vec![0, 3]), Match::new(vec![0, 1])];
        matches.sort();
        assert_eq!(
            matches.iter().map(|m| m.targets().to_vec()).collect::<Vec<_>>(),
            vec![vec![0, 1], vec![0, 3], vec![1, 2]]
        );
    }

    #[test]
    fn test_from_config() {
        let options = MatchOptions::from(&MatcherConfig::from_preset(Preset::Fast));
        assert_eq!(options.max_states, Some(100_000));
        assert!(!options.parallel);
        assert!(!options.first_only);
    }

    #[test]
    fn test_match_accessors() {
        let m = Match::new(vec![4, 7]);
        assert_eq!(m.target(1), Some(7));
        assert_eq!(m.target(2), None);
        assert_eq!(m.to_map().into_iter().collect::<Vec<_>>(), vec![(0, 4), (1, 7)]);
    }
}
