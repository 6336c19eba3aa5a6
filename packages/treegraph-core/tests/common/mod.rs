//! Common test utilities for treegraph-core
//!
//! Shared fixtures and builders for integration tests.

#![allow(dead_code)]

mod builders;
mod fixtures;

pub use builders::*;
pub use fixtures::*;
