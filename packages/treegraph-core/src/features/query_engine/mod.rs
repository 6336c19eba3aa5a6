//! Query Engine
//!
//! Lazy, set-theoretic collections over syntax trees.
//!
//! # Example
//!
//! ```rust,ignore
//! use treegraph_core::features::query_engine::{NodeCollection, Predicate};
//!
//! let all = NodeCollection::from_tree(&tree)?;
//! let defs = all.filter(Predicate::type_name("function_definition"));
//! let named = all.filter(Predicate::field("name"));
//! let def_names = defs.descendants()?.intersection(&named)?;
//! ```

pub mod dispatch;
pub mod domain;
pub mod node_collection;

pub use dispatch::DispatchTable;
pub use domain::Predicate;
pub use node_collection::NodeCollection;
