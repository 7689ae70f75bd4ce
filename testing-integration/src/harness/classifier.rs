use asa_common::transaction::{SignedTransaction, TransactionPayload};
use log::{error, info};
use strum::Display;

use crate::error::HarnessResult;

use super::{Submitter, TestStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Expectation {
    Approval,
    Rejection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Outcome {
    Passed,
    Failed,
}

impl Outcome {
    fn matches(expectation: Expectation, approved: bool) -> Self {
        match (expectation, approved) {
            (Expectation::Approval, true) | (Expectation::Rejection, false) => Outcome::Passed,
            _ => Outcome::Failed,
        }
    }
}

/// Submits application calls and scores them against the expected verdict.
///
/// Only a program evaluation rejection counts as a rejected call. Any other
/// error, refused or evicted transactions included, aborts the run and leaves
/// the statistics untouched.
pub struct Classifier<'a> {
    submitter: &'a Submitter<'a>,
}

impl<'a> Classifier<'a> {
    pub fn new(submitter: &'a Submitter<'a>) -> Self {
        Self { submitter }
    }

    pub async fn expect_approval(
        &self,
        call: &SignedTransaction,
        stats: &mut TestStats,
    ) -> HarnessResult<Outcome> {
        self.classify(call, Expectation::Approval, stats).await
    }

    pub async fn expect_rejection(
        &self,
        call: &SignedTransaction,
        stats: &mut TestStats,
    ) -> HarnessResult<Outcome> {
        self.classify(call, Expectation::Rejection, stats).await
    }

    async fn classify(
        &self,
        call: &SignedTransaction,
        expectation: Expectation,
        stats: &mut TestStats,
    ) -> HarnessResult<Outcome> {
        let method = method_name(call);
        info!("{}: expecting {}", method, expectation);

        let approved = match self.submitter.submit_signed(call).await {
            Ok(_) => true,
            Err(e) if e.is_rejection() => {
                if log::log_enabled!(log::Level::Debug) {
                    log::debug!("{} rejected: {}", method, e);
                }
                false
            }
            Err(e) => return Err(e),
        };

        let outcome = Outcome::matches(expectation, approved);
        match outcome {
            Outcome::Passed => info!("{}: {}", method, outcome),
            Outcome::Failed => error!(
                "{}: {} (expected {}, got {})",
                method,
                outcome,
                expectation,
                if approved { "approval" } else { "rejection" }
            ),
        }

        stats.record(expectation, outcome);
        Ok(outcome)
    }
}

// First application argument, the method selector
fn method_name(call: &SignedTransaction) -> String {
    match call.get_transaction().get_payload() {
        TransactionPayload::ApplicationCall(call) => call
            .method()
            .map(|method| String::from_utf8_lossy(method).into_owned())
            .unwrap_or_else(|| "<no method>".to_owned()),
        payload => format!("<{}>", payload.get_type()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_matrix() {
        assert_eq!(Outcome::matches(Expectation::Approval, true), Outcome::Passed);
        assert_eq!(Outcome::matches(Expectation::Approval, false), Outcome::Failed);
        assert_eq!(Outcome::matches(Expectation::Rejection, false), Outcome::Passed);
        assert_eq!(Outcome::matches(Expectation::Rejection, true), Outcome::Failed);
        assert_eq!(Expectation::Rejection.to_string(), "rejection");
        assert_eq!(Outcome::Passed.to_string(), "PASSED");
    }
}
