//! Building blocks of an observer test run.

mod classifier;
mod poller;
mod provisioner;
mod stats;
mod submitter;

pub use classifier::{Classifier, Expectation, Outcome};
pub use poller::{wait_for_confirmation, ConfirmationPolicy};
pub use provisioner::Provisioner;
pub use stats::TestStats;
pub use submitter::Submitter;
