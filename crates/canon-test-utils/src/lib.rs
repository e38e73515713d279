//! Utilities shared by Canon tests.
//!
//! [`fixtures::b_pkg`] models the `b.pkg.B` class family: every accessor,
//! overload, and nesting edge case the analysis has to get right, in one
//! supplier.

pub mod fixtures;

pub use fixtures::{b_pkg, b_type, BPkg, FixtureBuilder};
