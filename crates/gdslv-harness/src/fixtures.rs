//! Built-in conformance fixtures.
//!
//! These reproduce, narratively, the end-to-end verifier scenarios named
//! in the test corpus this harness conforms to. The corpus states those
//! scenarios as literal hex byte sequences against an opcode-to-byte
//! table it never actually defines — and the one sequence it does give a
//! byte count for (a 6-byte "valid minimal stream") is impossible to
//! satisfy literally once `FENCE_WAIT`'s mandatory 4-byte operand is laid
//! out consistently (see `DESIGN.md`). So each fixture here is built with
//! [`crate::stream_builder`] from this crate's own opcode table instead
//! of copied hex, and is checked against the same pass/fail narrative and
//! diagnostic content the corpus describes.

use gdslv_core::{ConformanceLevel, VerifyConfig};

use crate::stream_builder::*;

/// A single named conformance scenario: a stream, the configuration to
/// verify it under, and the expected outcome.
#[derive(Debug, Clone)]
pub struct Fixture {
    pub name: &'static str,
    pub stream: Vec<u8>,
    pub config: VerifyConfig,
    pub expect_success: bool,
    /// A substring every one of the expected diagnostics must contain at
    /// least one match for (case-sensitive), or `None` to skip that check.
    pub expect_diagnostic_substring: Option<&'static str>,
}

/// The fixtures reproducing the conformance corpus's verifier scenarios.
#[must_use]
pub fn builtin_fixtures() -> Vec<Fixture> {
    vec![
        Fixture {
            name: "valid_minimal_stream",
            stream: stream(&[begin_stream(), end_stream()]),
            config: VerifyConfig::default(),
            expect_success: true,
            expect_diagnostic_substring: None,
        },
        Fixture {
            name: "missing_begin_stream",
            stream: stream(&[submit()]),
            config: VerifyConfig::default(),
            expect_success: false,
            expect_diagnostic_substring: Some("SUBMIT"),
        },
        Fixture {
            name: "unknown_opcode",
            stream: stream(&[begin_stream(), unknown(0xFF), end_stream()]),
            config: VerifyConfig::default(),
            expect_success: false,
            expect_diagnostic_substring: Some("unknown opcode"),
        },
        Fixture {
            name: "snapshot_during_submitted",
            stream: stream(&[begin_stream(), submit(), snapshot_begin(0)]),
            config: VerifyConfig::default(),
            expect_success: false,
            expect_diagnostic_substring: Some("SNAPSHOT_BEGIN"),
        },
        Fixture {
            name: "unterminated_snapshot",
            stream: stream(&[
                begin_stream(),
                submit(),
                fence_wait(1),
                snapshot_begin(0),
                end_stream(),
            ]),
            config: VerifyConfig::default(),
            expect_success: false,
            expect_diagnostic_substring: Some("unterminated snapshot"),
        },
        Fixture {
            name: "alloc_barrier_fence_commit",
            stream: stream(&[
                begin_stream(),
                alloc_buffer(7, 0, 4096, 0, 0),
                barrier(7, gdslv_opcodes::Domain::Device as u32, gdslv_opcodes::Domain::Host as u32),
                submit(),
                fence_wait(3),
                end_stream(),
            ]),
            config: VerifyConfig::default(),
            expect_success: true,
            expect_diagnostic_substring: None,
        },
        Fixture {
            name: "syntax_level_suppresses_phase_violations",
            stream: stream(&[submit()]),
            config: VerifyConfig {
                level: ConformanceLevel::Syntax,
                ..VerifyConfig::default()
            },
            expect_success: true,
            expect_diagnostic_substring: None,
        },
    ]
}
