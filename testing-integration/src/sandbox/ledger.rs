use asa_common::{
    api::{
        algod::{CompileResponse, NodeStatus, PendingTransaction, SuggestedParams},
        indexer::{AccountInfo, AccountResponse},
        kmd::{ListKeysResponse, ListWalletsResponse, WalletInfo},
    },
    config::{algos_to_microalgos, ONLINE_STATUS},
    crypto::{hash, Address},
    rpc::{ClientError, IndexerClient, LedgerClient, WalletClient},
    transaction::TxId,
};
use async_trait::async_trait;
use parking_lot::Mutex;

use super::state::{SandboxState, OFFLINE_STATUS};

pub const DEFAULT_WALLET_ID: &str = "4596a5cb20ccbedcec668762449363c1";
pub const DEFAULT_WALLET_NAME: &str = "unencrypted-default-wallet";
pub const DEFAULT_WALLET_PASSWORD: &str = "";

const GENESIS_BALANCE: u64 = algos_to_microalgos(4_000_000);

/// Ledger, wallet and indexer backed by one in-memory state.
///
/// The default wallet lists, in order: an offline genesis account, an online
/// account created after genesis, then the online genesis faucet.
pub struct SandboxLedger {
    state: Mutex<SandboxState>,
}

impl SandboxLedger {
    pub fn new() -> Self {
        let mut state = SandboxState::new();
        state.add_wallet_account(GENESIS_BALANCE, OFFLINE_STATUS, 0);
        state.add_wallet_account(GENESIS_BALANCE, ONLINE_STATUS, 1);
        state.add_wallet_account(GENESIS_BALANCE, ONLINE_STATUS, 0);
        Self {
            state: Mutex::new(state),
        }
    }

    // Default wallet without any online genesis account
    pub fn without_faucet() -> Self {
        let mut state = SandboxState::new();
        state.add_wallet_account(GENESIS_BALANCE, OFFLINE_STATUS, 0);
        state.add_wallet_account(GENESIS_BALANCE, ONLINE_STATUS, 1);
        Self {
            state: Mutex::new(state),
        }
    }

    // No wallet at all
    pub fn without_wallet() -> Self {
        let ledger = Self::without_faucet();
        ledger.state.lock().wallet_present = false;
        ledger
    }

    // Observer calls succeed whatever the holding
    pub fn set_approve_everything(&self, value: bool) {
        self.state.lock().approve_everything = value;
    }

    // No new block is ever produced
    pub fn set_stalled(&self, value: bool) {
        self.state.lock().stalled = value;
    }

    // The next accepted transaction is dropped from the pool with this error
    pub fn evict_next_submission(&self, error: &str) {
        self.state.lock().evict_next = Some(error.to_owned());
    }

    pub fn current_round(&self) -> u64 {
        self.state.lock().round
    }

    pub fn submissions(&self) -> u64 {
        self.state.lock().submissions
    }

    pub fn open_handles(&self) -> usize {
        self.state.lock().handles.len()
    }

    pub fn faucet_address(&self) -> Option<Address> {
        let state = self.state.lock();
        state
            .wallet_keys
            .iter()
            .map(|keypair| keypair.address())
            .find(|address| {
                state
                    .account_info(address)
                    .is_some_and(|info| info.is_online() && info.is_genesis())
            })
    }

    pub fn account(&self, address: &Address) -> Option<AccountInfo> {
        self.state.lock().account_info(address)
    }

    fn status_of(state: &SandboxState) -> NodeStatus {
        NodeStatus {
            last_round: state.round,
            last_version: "future".to_owned(),
            time_since_last_round: 0,
        }
    }

    fn check_handle(state: &SandboxState, handle: &str) -> Result<(), ClientError> {
        if state.handles.iter().any(|h| h == handle) {
            Ok(())
        } else {
            Err(ClientError::Http {
                status: 401,
                message: "invalid wallet handle".to_owned(),
            })
        }
    }

    fn check_password(password: &str) -> Result<(), ClientError> {
        if password == DEFAULT_WALLET_PASSWORD {
            Ok(())
        } else {
            Err(ClientError::Http {
                status: 401,
                message: "wrong password".to_owned(),
            })
        }
    }
}

impl Default for SandboxLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerClient for SandboxLedger {
    async fn status(&self) -> Result<NodeStatus, ClientError> {
        Ok(Self::status_of(&self.state.lock()))
    }

    async fn status_after_block(&self, round: u64) -> Result<NodeStatus, ClientError> {
        let mut state = self.state.lock();
        if !state.stalled {
            while state.round <= round {
                state.produce_block();
            }
        }
        Ok(Self::status_of(&state))
    }

    async fn pending_transaction_info(
        &self,
        tx_id: &TxId,
    ) -> Result<PendingTransaction, ClientError> {
        self.state
            .lock()
            .pending
            .get(tx_id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("transaction {tx_id}")))
    }

    async fn suggested_params(&self) -> Result<SuggestedParams, ClientError> {
        Ok(self.state.lock().suggested_params())
    }

    async fn compile(&self, source: &str) -> Result<CompileResponse, ClientError> {
        let version = source
            .lines()
            .next()
            .and_then(|line| line.strip_prefix("#pragma version "))
            .and_then(|version| version.trim().parse::<u8>().ok())
            .ok_or_else(|| ClientError::Http {
                status: 400,
                message: "missing #pragma version".to_owned(),
            })?;

        let mut program = vec![version];
        program.extend_from_slice(hash(source.as_bytes()).as_bytes());
        Ok(CompileResponse {
            hash: Address::for_program(&program).to_string(),
            result: program,
        })
    }

    async fn send_raw_transaction(&self, bytes: &[u8]) -> Result<TxId, ClientError> {
        self.state.lock().submit(bytes)
    }
}

#[async_trait]
impl WalletClient for SandboxLedger {
    async fn list_wallets(&self) -> Result<ListWalletsResponse, ClientError> {
        let state = self.state.lock();
        let wallets = if state.wallet_present {
            vec![WalletInfo {
                id: DEFAULT_WALLET_ID.to_owned(),
                name: DEFAULT_WALLET_NAME.to_owned(),
                driver_name: "sqlite".to_owned(),
            }]
        } else {
            Vec::new()
        };
        Ok(ListWalletsResponse { wallets })
    }

    async fn init_wallet_handle(
        &self,
        wallet_id: &str,
        password: &str,
    ) -> Result<String, ClientError> {
        let mut state = self.state.lock();
        if !state.wallet_present || wallet_id != DEFAULT_WALLET_ID {
            return Err(ClientError::NotFound(format!("wallet {wallet_id}")));
        }
        Self::check_password(password)?;

        state.next_handle += 1;
        let handle = format!("handle-{}", state.next_handle);
        state.handles.push(handle.clone());
        Ok(handle)
    }

    async fn list_keys(&self, handle: &str) -> Result<ListKeysResponse, ClientError> {
        let state = self.state.lock();
        Self::check_handle(&state, handle)?;
        Ok(ListKeysResponse {
            addresses: state.wallet_keys.iter().map(|k| k.address()).collect(),
        })
    }

    async fn export_key(
        &self,
        handle: &str,
        password: &str,
        address: &Address,
    ) -> Result<Vec<u8>, ClientError> {
        let state = self.state.lock();
        Self::check_handle(&state, handle)?;
        Self::check_password(password)?;

        let keypair = state
            .wallet_keys
            .iter()
            .find(|keypair| keypair.address() == *address)
            .ok_or_else(|| ClientError::NotFound(format!("key {address}")))?;

        let mut exported = keypair.secret_key().as_bytes().to_vec();
        exported.extend_from_slice(keypair.public_key().as_bytes());
        Ok(exported)
    }

    async fn release_wallet_handle(&self, handle: &str) -> Result<(), ClientError> {
        let mut state = self.state.lock();
        Self::check_handle(&state, handle)?;
        state.handles.retain(|h| h != handle);
        Ok(())
    }
}

#[async_trait]
impl IndexerClient for SandboxLedger {
    async fn account_info(&self, address: &Address) -> Result<AccountResponse, ClientError> {
        let state = self.state.lock();
        let account = state
            .account_info(address)
            .ok_or_else(|| ClientError::NotFound(format!("account {address}")))?;
        Ok(AccountResponse {
            account,
            current_round: state.round,
        })
    }
}
