//! rclr Test Kit - Conformance testing utilities.
//!
//! This crate provides utilities for checking what the converter builds inside
//! the interpreter, using the in-memory engine as the interpreter.
//!
//! # Key Types
//!
//! - [`SexpSnapshot`]: Captures a converted value tree for comparison
//! - [`SnapshotDiff`]: Lists every difference between two snapshots
//! - [`Scenario`]: Defines an input, flags, and the expected outcome
//!
//! # Example
//!
//! ```
//! use rclr_testkit::{run_scenario, Scenario, SexpSnapshot};
//!
//! let scenario = Scenario::builder("ints", vec![1, 2, 3])
//!     .expect_converted(SexpSnapshot::integer(&[1, 2, 3]))
//!     .expect_retained(1)
//!     .build();
//!
//! assert!(run_scenario(&scenario).passed());
//! ```

mod diff;
mod integration;
mod scenario;
mod snapshot;

pub use diff::{Mismatch, SnapshotDiff};
pub use scenario::{
    run_scenario, run_scenario_with, standard, ExpectedResult, Expectation, Scenario,
    ScenarioBuilder, ScenarioResult,
};
pub use snapshot::{SexpSnapshot, SnapshotError, SnapshotValues};

/// Re-export rclr_core for convenience in tests.
pub use rclr_core;
