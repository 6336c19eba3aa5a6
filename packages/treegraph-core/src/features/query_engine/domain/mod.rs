//! Query domain: node predicates

pub mod predicate;

pub use predicate::Predicate;
