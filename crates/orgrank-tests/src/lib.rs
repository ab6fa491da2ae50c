//! Scenario and property test suite for orgrank.
//!
//! Exercises the metrics engine and reward calculator together, end to
//! end, on hand-built and generated organization trees.

pub mod helpers;
