use std::time::Duration;

use asa_common::{
    api::algod::PendingTransaction, rpc::LedgerClient, transaction::TxId,
};
use log::{debug, trace};
use tokio::time::{timeout, Instant};

use crate::{
    config::{DEFAULT_CONFIRMATION_TIMEOUT_SECS, DEFAULT_MAX_ROUNDS},
    error::{HarnessError, HarnessResult},
};

/// Bounds of the wait for a transaction confirmation.
/// Whichever limit is hit first ends the wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    pub max_rounds: u64,
    pub timeout: Duration,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            timeout: Duration::from_secs(DEFAULT_CONFIRMATION_TIMEOUT_SECS),
        }
    }
}

/// Wait until the transaction is included in a block and return its record.
///
/// A pool error means the node dropped the transaction, which is reported as
/// [`HarnessError::Evicted`] and never counts as a rejection. Polling an already confirmed transaction
/// returns its record right away.
pub async fn wait_for_confirmation(
    ledger: &dyn LedgerClient,
    tx_id: &TxId,
    policy: &ConfirmationPolicy,
) -> HarnessResult<PendingTransaction> {
    let start = Instant::now();
    let mut rounds = 0;

    let result = timeout(policy.timeout, poll(ledger, tx_id, policy, &mut rounds)).await;
    match result {
        Ok(result) => result,
        Err(_) => Err(HarnessError::ConfirmationTimeout {
            tx_id: *tx_id,
            rounds,
            elapsed: start.elapsed(),
        }),
    }
}

async fn poll(
    ledger: &dyn LedgerClient,
    tx_id: &TxId,
    policy: &ConfirmationPolicy,
    rounds: &mut u64,
) -> HarnessResult<PendingTransaction> {
    let start = Instant::now();
    let mut current_round = ledger.status().await?.last_round;

    loop {
        let info = ledger.pending_transaction_info(tx_id).await?;
        if info.is_confirmed() {
            if log::log_enabled!(log::Level::Debug) {
                debug!(
                    "Transaction {} confirmed in round {:?}",
                    tx_id, info.confirmed_round
                );
            }
            return Ok(info);
        }

        if let Some(error) = info.pool_error() {
            return Err(HarnessError::Evicted {
                tx_id: *tx_id,
                message: error.to_owned(),
            });
        }

        if *rounds >= policy.max_rounds {
            return Err(HarnessError::ConfirmationTimeout {
                tx_id: *tx_id,
                rounds: *rounds,
                elapsed: start.elapsed(),
            });
        }

        if log::log_enabled!(log::Level::Trace) {
            trace!("Waiting for round {} to confirm {}", current_round + 1, tx_id);
        }
        let status = ledger.status_after_block(current_round).await?;
        current_round = status.last_round.max(current_round + 1);
        *rounds += 1;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use asa_common::{
        api::algod::{CompileResponse, NodeStatus, SuggestedParams},
        crypto::Hash,
        rpc::ClientError,
    };
    use async_trait::async_trait;

    use super::*;

    // Ledger confirming every transaction at a fixed round
    struct ScriptedLedger {
        round: AtomicU64,
        confirm_at: Option<u64>,
        pool_error: String,
        block_delay: Duration,
    }

    impl ScriptedLedger {
        fn new(confirm_at: Option<u64>) -> Self {
            Self {
                round: AtomicU64::new(1),
                confirm_at,
                pool_error: String::new(),
                block_delay: Duration::ZERO,
            }
        }

        fn status_now(&self) -> NodeStatus {
            NodeStatus {
                last_round: self.round.load(Ordering::SeqCst),
                last_version: String::new(),
                time_since_last_round: 0,
            }
        }
    }

    #[async_trait]
    impl LedgerClient for ScriptedLedger {
        async fn status(&self) -> Result<NodeStatus, ClientError> {
            Ok(self.status_now())
        }

        async fn status_after_block(&self, round: u64) -> Result<NodeStatus, ClientError> {
            tokio::time::sleep(self.block_delay).await;
            self.round.fetch_max(round + 1, Ordering::SeqCst);
            Ok(self.status_now())
        }

        async fn pending_transaction_info(
            &self,
            _: &TxId,
        ) -> Result<PendingTransaction, ClientError> {
            let round = self.round.load(Ordering::SeqCst);
            let confirmed_round = self.confirm_at.filter(|at| round >= *at);
            Ok(PendingTransaction {
                confirmed_round,
                pool_error: self.pool_error.clone(),
                ..Default::default()
            })
        }

        async fn suggested_params(&self) -> Result<SuggestedParams, ClientError> {
            unimplemented!()
        }

        async fn compile(&self, _: &str) -> Result<CompileResponse, ClientError> {
            unimplemented!()
        }

        async fn send_raw_transaction(&self, _: &[u8]) -> Result<TxId, ClientError> {
            unimplemented!()
        }
    }

    fn tx_id() -> TxId {
        TxId::new(Hash::new([1; 32]))
    }

    #[tokio::test]
    async fn test_confirms_after_a_few_rounds() {
        let ledger = ScriptedLedger::new(Some(4));
        let info = wait_for_confirmation(&ledger, &tx_id(), &ConfirmationPolicy::default())
            .await
            .unwrap();
        assert_eq!(info.confirmed_round, Some(4));

        // Idempotent once confirmed
        let again = wait_for_confirmation(&ledger, &tx_id(), &ConfirmationPolicy::default())
            .await
            .unwrap();
        assert_eq!(again, info);
    }

    #[tokio::test]
    async fn test_round_limit() {
        let ledger = ScriptedLedger::new(None);
        let policy = ConfirmationPolicy {
            max_rounds: 3,
            timeout: Duration::from_secs(5),
        };
        let err = wait_for_confirmation(&ledger, &tx_id(), &policy)
            .await
            .unwrap_err();
        assert!(matches!(err, HarnessError::ConfirmationTimeout { rounds: 3, .. }));
    }

    #[tokio::test]
    async fn test_wall_clock_limit() {
        let mut ledger = ScriptedLedger::new(None);
        ledger.block_delay = Duration::from_secs(10);
        let policy = ConfirmationPolicy {
            max_rounds: 100,
            timeout: Duration::from_millis(50),
        };
        let err = wait_for_confirmation(&ledger, &tx_id(), &policy)
            .await
            .unwrap_err();
        assert!(matches!(err, HarnessError::ConfirmationTimeout { rounds: 0, .. }));
        assert!(!err.is_rejection());
    }

    #[tokio::test]
    async fn test_pool_error_is_eviction() {
        let mut ledger = ScriptedLedger::new(None);
        ledger.pool_error = "transaction pool is full".to_owned();
        let err = wait_for_confirmation(&ledger, &tx_id(), &ConfirmationPolicy::default())
            .await
            .unwrap_err();
        assert!(!err.is_rejection());
        match err {
            HarnessError::Evicted { tx_id: id, message } => {
                assert_eq!(id, tx_id());
                assert_eq!(message, "transaction pool is full");
            }
            err => panic!("unexpected error: {err}"),
        }
    }
}
