//! Common test utilities for codegraph-pta
//!
//! Program fixtures shared by the integration and property tests.

#![allow(dead_code)]

mod fixtures;

pub use fixtures::*;
