//! Pattern matching domain: matches, options, matchers

pub mod matchers;
pub mod matching;

pub use matching::{EdgeMatcher, Match, MatchOptions, NodeMatcher};
