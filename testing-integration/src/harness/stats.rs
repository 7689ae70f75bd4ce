use std::fmt;

use super::{Expectation, Outcome};

/// Tally of a run.
///
/// Every recorded scenario bumps exactly one expectation counter and exactly
/// one outcome counter, so both pairs always sum to the same total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TestStats {
    pub approval_unit_tests: u64,
    pub rejection_unit_tests: u64,
    pub passed_tests: u64,
    pub failed_tests: u64,
}

impl TestStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, expectation: Expectation, outcome: Outcome) {
        match expectation {
            Expectation::Approval => self.approval_unit_tests += 1,
            Expectation::Rejection => self.rejection_unit_tests += 1,
        }
        match outcome {
            Outcome::Passed => self.passed_tests += 1,
            Outcome::Failed => self.failed_tests += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.approval_unit_tests + self.rejection_unit_tests
    }

    pub fn is_success(&self) -> bool {
        self.failed_tests == 0
    }
}

impl fmt::Display for TestStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Approval unit tests: {}", self.approval_unit_tests)?;
        writeln!(f, "Rejection unit tests: {}", self.rejection_unit_tests)?;
        writeln!(f, "Total unit tests: {}", self.total())?;
        writeln!(f, "Passed: {}", self.passed_tests)?;
        write!(f, "Failed: {}", self.failed_tests)
    }
}
