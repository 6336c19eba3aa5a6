//! VF2-style subgraph matcher
//!
//! Finds every injective mapping of pattern nodes onto target nodes such that
//! each pattern edge has a target edge in the same direction and all matchers
//! accept. With `induced`, target edges between mapped nodes that the pattern
//! lacks are forbidden as well.
//!
//! # Algorithm
//!
//! Backtracking over a static order of pattern nodes:
//! 1. Order: repeatedly take the lowest-index unordered node adjacent to an
//!    ordered node, else the lowest-index unordered node
//! 2. Each node with an ordered neighbor is *anchored*: its candidates are the
//!    target neighbors (respecting direction) of the anchor's image
//! 3. A candidate is accepted if unused, degree look-ahead passes, the node
//!    matcher accepts, and every edge to an already-mapped node exists and is
//!    accepted by the edge matcher
//!
//! # Performance
//!
//! - Worst case exponential; bounded by `max_states` candidate evaluations
//! - Optional rayon split of the root level; results are merged and sorted so
//!   parallel and sequential runs return identical lists

use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, info, warn};

use crate::errors::{Result, TreegraphError};
use crate::features::graph_projection::Graph;
use crate::features::pattern_matching::domain::{EdgeMatcher, Match, MatchOptions, NodeMatcher};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

const UNMAPPED: usize = usize::MAX;

/// Subgraph matcher for one pattern
///
/// Example:
/// ```ignore
/// let matches = SubgraphMatcher::new(&pattern)
///     .node_matcher(matchers::same_type_name())
///     .options(MatchOptions::default().induced(true))
///     .find_matches(&target)?;
/// ```
#[derive(Clone)]
pub struct SubgraphMatcher<'p> {
    pattern: &'p Graph,
    node_matcher: Option<NodeMatcher>,
    edge_matcher: Option<EdgeMatcher>,
    options: MatchOptions,
}

impl<'p> SubgraphMatcher<'p> {
    pub fn new(pattern: &'p Graph) -> Self {
        Self {
            pattern,
            node_matcher: None,
            edge_matcher: None,
            options: MatchOptions::default(),
        }
    }

    pub fn node_matcher(mut self, matcher: NodeMatcher) -> Self {
        self.node_matcher = Some(matcher);
        self
    }

    pub fn edge_matcher(mut self, matcher: EdgeMatcher) -> Self {
        self.edge_matcher = Some(matcher);
        self
    }

    pub fn options(mut self, options: MatchOptions) -> Self {
        self.options = options;
        self
    }

    /// All embeddings of the pattern in `target`, canonically sorted
    pub fn find_matches(&self, target: &Graph) -> Result<Vec<Match>> {
        if self.pattern.is_directed() != target.is_directed() {
            return Err(TreegraphError::invalid_operation(
                "pattern/target",
                format!(
                    "pattern is {} but target is {}",
                    directedness(self.pattern),
                    directedness(target)
                ),
            ));
        }
        if self.pattern.is_empty() || self.pattern.node_count() > target.node_count() {
            return Ok(Vec::new());
        }

        let plan = Plan::new(self.pattern);
        let states = AtomicUsize::new(0);
        let all_targets: Vec<usize> = (0..target.node_count()).collect();
        let ctx = Context {
            pattern: self.pattern,
            target,
            plan: &plan,
            all_targets: &all_targets,
            node_matcher: self.node_matcher.as_ref(),
            edge_matcher: self.edge_matcher.as_ref(),
            options: &self.options,
            states: &states,
        };

        let searched = if self.use_parallel() {
            ctx.search_parallel()
        } else {
            let mut state = State::new(self.pattern.node_count(), target.node_count());
            ctx.extend(&mut state, 0).map(|_| state.results)
        };
        let mut matches = match searched {
            Ok(matches) => matches,
            Err(err) => {
                if err.is_resource_exhausted() {
                    warn!(
                        pattern_nodes = self.pattern.node_count(),
                        target_nodes = target.node_count(),
                        "Subgraph search exceeded its state budget"
                    );
                }
                return Err(err);
            }
        };
        matches.sort();

        debug!(
            states = states.load(Ordering::Relaxed),
            "Subgraph search statistics"
        );
        info!(
            pattern_nodes = self.pattern.node_count(),
            target_nodes = target.node_count(),
            matches = matches.len(),
            "Subgraph search complete"
        );
        Ok(matches)
    }

    /// First embedding in search order, if any
    pub fn find_first(&self, target: &Graph) -> Result<Option<Match>> {
        let matcher = self
            .clone()
            .options(self.options.clone().first_only(true));
        Ok(matcher.find_matches(target)?.into_iter().next())
    }

    pub fn is_match(&self, target: &Graph) -> Result<bool> {
        Ok(self.find_first(target)?.is_some())
    }

    fn use_parallel(&self) -> bool {
        cfg!(feature = "parallel") && self.options.parallel && !self.options.first_only
    }
}

fn directedness(graph: &Graph) -> &'static str {
    if graph.is_directed() {
        "directed"
    } else {
        "undirected"
    }
}

/// Where a pattern node's candidates come from
#[derive(Debug, Clone, Copy)]
struct Anchor {
    /// Already-ordered pattern neighbor
    pattern: usize,
    /// Candidates are successors (true) or predecessors (false) of its image
    outgoing: bool,
}

/// Static search order
#[derive(Debug)]
struct Plan {
    order: Vec<usize>,
    anchors: Vec<Option<Anchor>>,
}

impl Plan {
    fn new(pattern: &Graph) -> Self {
        let n = pattern.node_count();
        let mut ordered = vec![false; n];
        let mut order = Vec::with_capacity(n);
        let mut anchors = Vec::with_capacity(n);

        while order.len() < n {
            let next = (0..n)
                .find(|&p| {
                    !ordered[p]
                        && pattern
                            .neighbors_undirected(p)
                            .iter()
                            .any(|&q| ordered[q])
                })
                .or_else(|| (0..n).find(|&p| !ordered[p]));
            let Some(p) = next else { break };

            let anchor = pattern
                .neighbors_undirected(p)
                .into_iter()
                .find(|&q| ordered[q])
                .map(|q| Anchor {
                    pattern: q,
                    outgoing: !pattern.is_directed() || pattern.has_edge(q, p),
                });

            ordered[p] = true;
            order.push(p);
            anchors.push(anchor);
        }

        Self { order, anchors }
    }
}

/// Mutable search state
struct State {
    core_p: Vec<usize>,
    core_t: Vec<usize>,
    results: Vec<Match>,
}

impl State {
    fn new(pattern_nodes: usize, target_nodes: usize) -> Self {
        Self {
            core_p: vec![UNMAPPED; pattern_nodes],
            core_t: vec![UNMAPPED; target_nodes],
            results: Vec::new(),
        }
    }

    fn assign(&mut self, p: usize, t: usize) {
        self.core_p[p] = t;
        self.core_t[t] = p;
    }

    fn unassign(&mut self, p: usize, t: usize) {
        self.core_p[p] = UNMAPPED;
        self.core_t[t] = UNMAPPED;
    }
}

/// Immutable search context shared by all workers
struct Context<'a> {
    pattern: &'a Graph,
    target: &'a Graph,
    plan: &'a Plan,
    all_targets: &'a [usize],
    node_matcher: Option<&'a NodeMatcher>,
    edge_matcher: Option<&'a EdgeMatcher>,
    options: &'a MatchOptions,
    states: &'a AtomicUsize,
}

impl<'a> Context<'a> {
    /// Extend the mapping at `depth`. Returns `true` when the search should stop.
    fn extend(&self, state: &mut State, depth: usize) -> Result<bool> {
        if depth == self.plan.order.len() {
            state.results.push(Match::new(state.core_p.clone()));
            return Ok(self.options.first_only);
        }

        let p = self.plan.order[depth];
        for &t in self.candidates(state, depth) {
            if self.try_candidate(state, p, t)? {
                state.assign(p, t);
                let stop = self.extend(state, depth + 1)?;
                state.unassign(p, t);
                if stop {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    fn candidates(&self, state: &State, depth: usize) -> &'a [usize] {
        match self.plan.anchors[depth] {
            Some(anchor) => {
                let image = state.core_p[anchor.pattern];
                if anchor.outgoing {
                    self.target.successors(image)
                } else {
                    self.target.predecessors(image)
                }
            }
            None => self.all_targets,
        }
    }

    /// Count one state against the budget, then test feasibility
    fn try_candidate(&self, state: &State, p: usize, t: usize) -> Result<bool> {
        let explored = self.states.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(limit) = self.options.max_states {
            if explored > limit {
                return Err(TreegraphError::exhausted("matcher states", limit));
            }
        }
        self.feasible(state, p, t)
    }

    fn feasible(&self, state: &State, p: usize, t: usize) -> Result<bool> {
        let (pattern, target) = (self.pattern, self.target);

        if state.core_t[t] != UNMAPPED {
            return Ok(false);
        }

        if self.options.degree_lookahead {
            let enough = if pattern.is_directed() {
                target.out_degree(t) >= pattern.out_degree(p)
                    && target.in_degree(t) >= pattern.in_degree(p)
            } else {
                target.degree(t) >= pattern.degree(p)
            };
            if !enough {
                return Ok(false);
            }
        }

        if let Some(matcher) = self.node_matcher {
            if let (Some(pw), Some(tw)) = (pattern.node(p), target.node(t)) {
                let accepted = matcher(pw, tw).map_err(|e| {
                    TreegraphError::invalid_operation(
                        format!("node matcher on pattern {} -> target {}", p, t),
                        e,
                    )
                })?;
                if !accepted {
                    return Ok(false);
                }
            }
        }

        // Pattern edges to already-mapped nodes must exist in the target
        for &q in pattern.successors(p) {
            let tq = state.core_p[q];
            if tq != UNMAPPED && !self.edge_ok((p, q), (t, tq))? {
                return Ok(false);
            }
        }
        if pattern.is_directed() {
            for &q in pattern.predecessors(p) {
                let tq = state.core_p[q];
                if tq != UNMAPPED && !self.edge_ok((q, p), (tq, t))? {
                    return Ok(false);
                }
            }
        }

        if self.options.induced {
            for &u in target.successors(t) {
                let q = state.core_t[u];
                if q != UNMAPPED && !pattern.has_edge(p, q) {
                    return Ok(false);
                }
            }
            if target.is_directed() {
                for &u in target.predecessors(t) {
                    let q = state.core_t[u];
                    if q != UNMAPPED && !pattern.has_edge(q, p) {
                        return Ok(false);
                    }
                }
            }
        }

        Ok(true)
    }

    /// Target edge exists for the pattern edge and the edge matcher accepts it
    fn edge_ok(&self, pattern_edge: (usize, usize), target_edge: (usize, usize)) -> Result<bool> {
        let Some(tw) = self.target.edge(target_edge.0, target_edge.1) else {
            return Ok(false);
        };
        let Some(matcher) = self.edge_matcher else {
            return Ok(true);
        };
        let Some(pw) = self.pattern.edge(pattern_edge.0, pattern_edge.1) else {
            return Ok(true);
        };
        matcher(pw, tw).map_err(|e| {
            TreegraphError::invalid_operation(
                format!(
                    "edge matcher on pattern {}->{} / target {}->{}",
                    pattern_edge.0, pattern_edge.1, target_edge.0, target_edge.1
                ),
                e,
            )
        })
    }

    /// Root-level split across the rayon pool
    #[cfg(feature = "parallel")]
    fn search_parallel(&self) -> Result<Vec<Match>> {
        let root = self.plan.order[0];
        let (pn, tn) = (self.pattern.node_count(), self.target.node_count());

        let per_root: Vec<Result<Vec<Match>>> = self
            .all_targets
            .par_iter()
            .map(|&t| {
                let mut state = State::new(pn, tn);
                if self.try_candidate(&state, root, t)? {
                    state.assign(root, t);
                    self.extend(&mut state, 1)?;
                }
                Ok(state.results)
            })
            .collect();

        let mut matches = Vec::new();
        for result in per_root {
            matches.extend(result?);
        }
        Ok(matches)
    }

    #[cfg(not(feature = "parallel"))]
    fn search_parallel(&self) -> Result<Vec<Match>> {
        let mut state = State::new(self.pattern.node_count(), self.target.node_count());
        self.extend(&mut state, 0)?;
        Ok(state.results)
    }
}
