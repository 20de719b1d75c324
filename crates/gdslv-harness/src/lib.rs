//! Conformance fixture harness for the GDSL verifier and diff engine.
//!
//! This crate is test tooling, not part of the verifier's or diff
//! engine's public contract: it runs a corpus of named scenarios and
//! renders a pass/fail report, in both human-readable text and
//! machine-readable (`serde_json`) form.

pub mod fixtures;
pub mod report;
pub mod runner;
pub mod stream_builder;

pub use fixtures::{builtin_fixtures, Fixture};
pub use report::{ConformanceSummary, FixtureOutcome};
pub use runner::run_fixtures;
