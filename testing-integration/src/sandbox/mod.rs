//! In-memory sandbox for tests
//!
//! **IMPORTANT**: This is NOT a ledger implementation!
//!
//! It answers the ledger, wallet and indexer client traits from a single
//! in-memory state so a full observer run can execute without a network:
//!
//! - signatures and logic sig delegations are checked
//! - payments, asset creation and application creation update balances
//! - observer calls are evaluated natively instead of running the program
//! - a block is produced each time a client waits for the next round
//!
//! Knobs on [`SandboxLedger`] simulate a broken observer, a stalled network
//! or evicted transactions.
//!
//! ```rust,ignore
//! let sandbox = SandboxLedger::new();
//! let stats = Orchestrator::new(&sandbox, &sandbox, &sandbox, config).run().await?;
//! assert_eq!(stats.passed_tests, 14);
//! ```

mod ledger;
mod state;

pub use ledger::SandboxLedger;
