//! Shared test utilities for outliner integration tests.
//!
//! This module provides:
//! - `TestHarness` for isolated orchestrator runs with temp directories
//! - `StubTransform` and `RecordingClipboard` test doubles

pub mod doubles;
pub mod harness;

pub use doubles::{RecordingClipboard, StubTransform};
pub use harness::TestHarness;
