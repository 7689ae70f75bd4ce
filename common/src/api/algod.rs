use serde::{Deserialize, Serialize};

use crate::{crypto::Hash, transaction::TxId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NodeStatus {
    pub last_round: u64,
    #[serde(default)]
    pub last_version: String,
    #[serde(default)]
    pub time_since_last_round: u64,
}

/// Status of a transaction as seen by the node's pool.
///
/// `confirmed_round` is set once the transaction is in a block. A non-empty
/// `pool_error` means the node evicted it and it will never confirm.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PendingTransaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_round: Option<u64>,
    #[serde(default)]
    pub pool_error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_index: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_index: Option<u64>,
}

impl PendingTransaction {
    pub fn is_confirmed(&self) -> bool {
        self.confirmed_round.is_some_and(|round| round > 0)
    }

    pub fn pool_error(&self) -> Option<&str> {
        if self.pool_error.is_empty() {
            None
        } else {
            Some(&self.pool_error)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SuggestedParams {
    #[serde(default)]
    pub consensus_version: String,
    pub fee: u64,
    pub genesis_hash: Hash,
    pub genesis_id: String,
    pub last_round: u64,
    pub min_fee: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileResponse {
    // Program address
    pub hash: String,
    // Bytecode
    #[serde(with = "super::base64_bytes")]
    pub result: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostTransactionsResponse {
    #[serde(rename = "txId")]
    pub tx_id: TxId,
}
