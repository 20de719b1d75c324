//! Machine- and human-readable conformance report.

use serde::Serialize;

use gdslv_core::Report;

/// Outcome of running one [`crate::fixtures::Fixture`].
#[derive(Debug, Clone, Serialize)]
pub struct FixtureOutcome {
    pub name: String,
    pub passed: bool,
    pub expected_success: bool,
    pub actual_success: bool,
    pub failure_reason: Option<String>,
    pub instruction_count: usize,
    pub error_count: usize,
    pub warning_count: usize,
}

/// Summary over every fixture run in one invocation.
#[derive(Debug, Clone, Serialize, Default)]
pub struct ConformanceSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub outcomes: Vec<FixtureOutcome>,
}

impl ConformanceSummary {
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Renders a short human-readable table, in the order fixtures ran.
    #[must_use]
    pub fn render_text(&self) -> String {
        use std::fmt::Write;
        let mut out = String::new();
        for outcome in &self.outcomes {
            let status = if outcome.passed { "PASS" } else { "FAIL" };
            let _ = writeln!(
                out,
                "[{status}] {} (success={}, instructions={}, errors={}, warnings={})",
                outcome.name, outcome.actual_success, outcome.instruction_count, outcome.error_count, outcome.warning_count
            );
            if let Some(reason) = &outcome.failure_reason {
                let _ = writeln!(out, "       {reason}");
            }
        }
        let _ = writeln!(out, "{}/{} fixtures passed", self.passed, self.total);
        out
    }
}

pub(crate) fn outcome_for(name: &str, expected_success: bool, expected_substring: Option<&str>, report: &Report) -> FixtureOutcome {
    let mut failure_reason = None;

    if report.success != expected_success {
        failure_reason = Some(format!(
            "expected success={expected_success}, got success={}",
            report.success
        ));
    } else if let Some(substring) = expected_substring {
        let found = report.diagnostics.iter().any(|d| d.message.contains(substring));
        if !found {
            failure_reason = Some(format!(
                "expected a diagnostic containing {substring:?}, none found among {} diagnostics",
                report.diagnostics.len()
            ));
        }
    }

    FixtureOutcome {
        name: name.to_string(),
        passed: failure_reason.is_none(),
        expected_success,
        actual_success: report.success,
        failure_reason,
        instruction_count: report.instruction_count,
        error_count: report.error_count,
        warning_count: report.warning_count,
    }
}
