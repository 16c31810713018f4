//! Integration tests for full conversion workflows.
//!
//! These tests go through the public facade only and read results back from the
//! in-memory engine, the way a host call site would hand values to R and R
//! would see them.
