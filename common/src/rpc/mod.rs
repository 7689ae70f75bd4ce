//! Client seams for the three sandbox services.
//!
//! The harness only ever talks to the network through these traits, so an
//! in-memory ledger can stand in for the sandbox in tests.

#[cfg(feature = "rpc-client")]
pub mod http;

mod error;

pub use error::*;

use async_trait::async_trait;

use crate::{
    api::{
        algod::{CompileResponse, NodeStatus, PendingTransaction, SuggestedParams},
        indexer::AccountResponse,
        kmd::{ListKeysResponse, ListWalletsResponse},
    },
    crypto::Address,
    transaction::TxId,
};

/// Ledger node (algod v2).
#[async_trait]
pub trait LedgerClient: Send + Sync {
    async fn status(&self) -> Result<NodeStatus, ClientError>;

    // Blocks until the network has produced a block after `round`
    async fn status_after_block(&self, round: u64) -> Result<NodeStatus, ClientError>;

    async fn pending_transaction_info(&self, tx_id: &TxId)
        -> Result<PendingTransaction, ClientError>;

    async fn suggested_params(&self) -> Result<SuggestedParams, ClientError>;

    async fn compile(&self, source: &str) -> Result<CompileResponse, ClientError>;

    // A refusal by the ledger is reported as `ClientError::Rejected`
    async fn send_raw_transaction(&self, bytes: &[u8]) -> Result<TxId, ClientError>;
}

/// Key management daemon (kmd v1).
#[async_trait]
pub trait WalletClient: Send + Sync {
    async fn list_wallets(&self) -> Result<ListWalletsResponse, ClientError>;

    async fn init_wallet_handle(
        &self,
        wallet_id: &str,
        password: &str,
    ) -> Result<String, ClientError>;

    async fn list_keys(&self, handle: &str) -> Result<ListKeysResponse, ClientError>;

    // Seed followed by public key, 64 bytes
    async fn export_key(
        &self,
        handle: &str,
        password: &str,
        address: &Address,
    ) -> Result<Vec<u8>, ClientError>;

    async fn release_wallet_handle(&self, handle: &str) -> Result<(), ClientError>;
}

/// Indexer (v2).
#[async_trait]
pub trait IndexerClient: Send + Sync {
    async fn account_info(&self, address: &Address) -> Result<AccountResponse, ClientError>;
}
