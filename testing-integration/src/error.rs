use std::{io, path::PathBuf, time::Duration};

use asa_common::{
    account::AccountError,
    crypto::{Address, CryptoError},
    rpc::ClientError,
    transaction::TxId,
};
use thiserror::Error;

pub type HarnessResult<T> = Result<T, HarnessError>;

#[derive(Debug, Error)]
pub enum HarnessError {
    // Precondition: only accounts holding a signer may send
    #[error("Account {0} has no signer")]
    MissingSigner(Address),
    #[error("Account {0} cannot sign transactions sent by another account")]
    ForeignSender(Address),
    #[error("No online genesis account found in the default wallet")]
    FaucetNotFound,
    // A program refused the transaction during evaluation
    #[error("Transaction rejected by the ledger: {message}")]
    Rejected { message: String },
    // The node dropped the transaction from its pool
    #[error("Transaction {tx_id} evicted from the pool: {message}")]
    Evicted { tx_id: TxId, message: String },
    #[error("Transaction {tx_id} not confirmed after {rounds} rounds ({elapsed:?})")]
    ConfirmationTimeout {
        tx_id: TxId,
        rounds: u64,
        elapsed: Duration,
    },
    #[error(transparent)]
    Client(ClientError),
    #[error(transparent)]
    Crypto(#[from] CryptoError),
    #[error("Cannot write {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("Response is missing the field {0}")]
    MissingField(&'static str),
}

impl HarnessError {
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

impl From<ClientError> for HarnessError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::Rejected { message } => Self::Rejected { message },
            error => Self::Client(error),
        }
    }
}

impl From<AccountError> for HarnessError {
    fn from(error: AccountError) -> Self {
        match error {
            AccountError::MissingSigner(address) => Self::MissingSigner(address),
            AccountError::ForeignSender { signer, .. } => Self::ForeignSender(signer),
            AccountError::Crypto(error) => Self::Crypto(error),
        }
    }
}
