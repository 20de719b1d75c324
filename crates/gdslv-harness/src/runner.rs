//! Runs fixtures against the verifier and assembles a [`ConformanceSummary`].

use crate::fixtures::Fixture;
use crate::report::{outcome_for, ConformanceSummary};

/// Runs every fixture in `fixtures` and returns the aggregate summary.
#[must_use]
pub fn run_fixtures(fixtures: &[Fixture]) -> ConformanceSummary {
    let mut summary = ConformanceSummary::default();
    for fixture in fixtures {
        tracing::info!(fixture = fixture.name, "running conformance fixture");
        let report = gdslv_core::verify(&fixture.stream, &fixture.config);
        let outcome = outcome_for(
            fixture.name,
            fixture.expect_success,
            fixture.expect_diagnostic_substring,
            &report,
        );
        summary.total += 1;
        if outcome.passed {
            summary.passed += 1;
        } else {
            summary.failed += 1;
            tracing::warn!(fixture = fixture.name, reason = ?outcome.failure_reason, "fixture failed");
        }
        summary.outcomes.push(outcome);
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::builtin_fixtures;

    #[test]
    fn every_builtin_fixture_passes() {
        let summary = run_fixtures(&builtin_fixtures());
        assert!(summary.all_passed(), "{}", summary.render_text());
    }
}
