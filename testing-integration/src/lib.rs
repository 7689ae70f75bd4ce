//! End-to-end harness for the ASA State Observer application
//!
//! Deploys the observer on a local sandbox, creates a test asset held by the
//! deployer, then checks that every observer method approves or rejects as
//! expected.
//!
//! # Key Components
//!
//! - **Provisioner**: locates the sandbox faucet and funds fresh accounts
//! - **Submitter**: signs, submits and waits for transactions
//! - **Classifier**: scores each observer call against its expected verdict
//! - **Orchestrator**: runs the fixed scenario list and returns the tally
//! - **SandboxLedger**: in-memory stand-in for algod, kmd and the indexer
//!
//! # Example
//!
//! ```rust,ignore
//! use asa_testing_integration::{HarnessConfig, Orchestrator, SandboxLedger};
//!
//! #[tokio::test]
//! async fn test_observer() {
//!     let sandbox = SandboxLedger::new();
//!     let stats = Orchestrator::new(&sandbox, &sandbox, &sandbox, HarnessConfig::default())
//!         .run()
//!         .await
//!         .unwrap();
//!     assert!(stats.is_success());
//! }
//! ```

pub mod config;
pub mod contract;
pub mod error;
pub mod harness;
pub mod orchestrator;
pub mod sandbox;

pub use config::{ArtifactPaths, HarnessConfig};
pub use error::{HarnessError, HarnessResult};
pub use harness::{ConfirmationPolicy, TestStats};
pub use orchestrator::Orchestrator;
pub use sandbox::SandboxLedger;
