//! Command line configuration of the harness binary.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use asa_common::{
    config::{algos_to_microalgos, FLAT_FEE},
    logger::LogLevel,
    rpc::http::RestClientConfig,
};
use clap::{Args, Parser};

use crate::harness::ConfirmationPolicy;

pub const DEFAULT_ALGOD_ADDRESS: &str = "http://localhost:4001";
pub const DEFAULT_KMD_ADDRESS: &str = "http://localhost:4002";
pub const DEFAULT_INDEXER_ADDRESS: &str = "http://localhost:8980";
// Token shared by every service of the local sandbox
pub const DEFAULT_SANDBOX_TOKEN: &str =
    "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

// Funding of the deployer account: 1000 Algos
pub const DEFAULT_FUNDING_AMOUNT: u64 = algos_to_microalgos(1000);
pub const DEFAULT_MAX_ROUNDS: u64 = 10;
pub const DEFAULT_CONFIRMATION_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_ARTIFACTS_DIR: &str = "/tmp";

pub const SIGNED_TRANSACTION_FILENAME: &str = "txn.signed";
pub const APPROVAL_PROGRAM_FILENAME: &str = "approval.teal";
pub const CLEAR_PROGRAM_FILENAME: &str = "clear.teal";

#[derive(Debug, Clone, Args)]
pub struct NodeConfig {
    /// Ledger node (algod) address
    #[clap(long, default_value_t = String::from(DEFAULT_ALGOD_ADDRESS))]
    pub algod_address: String,
    /// Ledger node API token
    #[clap(long, default_value_t = String::from(DEFAULT_SANDBOX_TOKEN))]
    pub algod_token: String,
    /// Key management daemon (kmd) address
    #[clap(long, default_value_t = String::from(DEFAULT_KMD_ADDRESS))]
    pub kmd_address: String,
    /// Key management daemon API token
    #[clap(long, default_value_t = String::from(DEFAULT_SANDBOX_TOKEN))]
    pub kmd_token: String,
    /// Indexer address
    #[clap(long, default_value_t = String::from(DEFAULT_INDEXER_ADDRESS))]
    pub indexer_address: String,
    /// Indexer API token
    #[clap(long, default_value_t = String::from(DEFAULT_SANDBOX_TOKEN))]
    pub indexer_token: String,
    /// Advanced: HTTP request timeout in seconds
    #[clap(long, default_value_t = 30)]
    pub request_timeout_secs: u64,
    /// Advanced: HTTP connection timeout in seconds
    #[clap(long, default_value_t = 10)]
    pub connection_timeout_secs: u64,
}

impl NodeConfig {
    pub fn rest_client_config(&self) -> RestClientConfig {
        RestClientConfig {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            connection_timeout: Duration::from_secs(self.connection_timeout_secs),
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct FundingConfig {
    /// Amount in microAlgos sent from the faucet to the deployer account
    #[clap(long, default_value_t = DEFAULT_FUNDING_AMOUNT)]
    pub funding_amount: u64,
    /// Flat fee in microAlgos attached to every transaction
    #[clap(long, default_value_t = FLAT_FEE)]
    pub fee: u64,
    /// Password of the default kmd wallet
    #[clap(long, default_value_t = String::new())]
    pub wallet_password: String,
}

#[derive(Debug, Clone, Args)]
pub struct ConfirmationConfig {
    /// Maximum number of rounds to wait for a transaction confirmation
    #[clap(long, default_value_t = DEFAULT_MAX_ROUNDS)]
    pub max_rounds: u64,
    /// Maximum time in seconds to wait for a transaction confirmation
    #[clap(long, default_value_t = DEFAULT_CONFIRMATION_TIMEOUT_SECS)]
    pub confirmation_timeout_secs: u64,
}

impl ConfirmationConfig {
    pub fn policy(&self) -> ConfirmationPolicy {
        ConfirmationPolicy {
            max_rounds: self.max_rounds,
            timeout: Duration::from_secs(self.confirmation_timeout_secs),
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct LogConfig {
    /// Set log level
    #[clap(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
    /// Set file log level
    #[clap(long, value_enum)]
    pub file_log_level: Option<LogLevel>,
    /// Disable the log file
    #[clap(long)]
    pub disable_file_logging: bool,
    /// Disable the usage of colors in log
    #[clap(long)]
    pub disable_log_color: bool,
    /// Log filename
    #[clap(long, default_value_t = String::from("asa_observer_test.log"))]
    pub filename_log: String,
    /// Logs directory
    #[clap(long, default_value_t = String::from("logs/"))]
    pub logs_path: String,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "asa_observer_test")]
#[command(about = "End-to-end test of the ASA State Observer application on a local sandbox")]
#[command(version = asa_common::config::VERSION)]
#[command(styles = asa_common::get_cli_styles())]
pub struct Config {
    #[clap(flatten)]
    pub node: NodeConfig,
    #[clap(flatten)]
    pub funding: FundingConfig,
    #[clap(flatten)]
    pub confirmation: ConfirmationConfig,
    #[clap(flatten)]
    pub log: LogConfig,
    /// Directory receiving the signed transaction backup and the program sources
    #[clap(long, default_value_t = String::from(DEFAULT_ARTIFACTS_DIR))]
    pub artifacts_dir: String,
}

impl Config {
    pub fn harness_config(&self) -> HarnessConfig {
        HarnessConfig {
            policy: self.confirmation.policy(),
            funding_amount: self.funding.funding_amount,
            fee: self.funding.fee,
            wallet_password: self.funding.wallet_password.clone(),
            artifacts: ArtifactPaths::in_dir(&self.artifacts_dir),
        }
    }
}

/// Files written during a run. Each one is overwritten by the next write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub signed_transaction: PathBuf,
    pub approval_program: PathBuf,
    pub clear_program: PathBuf,
}

impl ArtifactPaths {
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            signed_transaction: dir.join(SIGNED_TRANSACTION_FILENAME),
            approval_program: dir.join(APPROVAL_PROGRAM_FILENAME),
            clear_program: dir.join(CLEAR_PROGRAM_FILENAME),
        }
    }
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self::in_dir(DEFAULT_ARTIFACTS_DIR)
    }
}

/// Runtime settings of a harness run, independent of the command line.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub policy: ConfirmationPolicy,
    pub funding_amount: u64,
    pub fee: u64,
    pub wallet_password: String,
    pub artifacts: ArtifactPaths,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            policy: ConfirmationPolicy::default(),
            funding_amount: DEFAULT_FUNDING_AMOUNT,
            fee: FLAT_FEE,
            wallet_password: String::new(),
            artifacts: ArtifactPaths::default(),
        }
    }
}
