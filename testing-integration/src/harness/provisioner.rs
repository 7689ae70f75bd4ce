use asa_common::{
    account::Account,
    api::algod::PendingTransaction,
    crypto::KeyPair,
    rpc::{ClientError, IndexerClient, WalletClient},
};
use log::{debug, info, warn};

use crate::error::{HarnessError, HarnessResult};

use super::Submitter;

/// Creates, locates and funds the accounts used by a run.
pub struct Provisioner<'a> {
    wallet: &'a dyn WalletClient,
    indexer: &'a dyn IndexerClient,
    submitter: &'a Submitter<'a>,
    wallet_password: String,
    funding_amount: u64,
}

impl<'a> Provisioner<'a> {
    pub fn new(
        wallet: &'a dyn WalletClient,
        indexer: &'a dyn IndexerClient,
        submitter: &'a Submitter<'a>,
        wallet_password: String,
        funding_amount: u64,
    ) -> Self {
        Self {
            wallet,
            indexer,
            submitter,
            wallet_password,
            funding_amount,
        }
    }

    // Fresh key pair, nothing is sent to the network
    pub fn create_account(&self) -> Account {
        let account = Account::generate();
        if log::log_enabled!(log::Level::Debug) {
            debug!("Generated account {}", account.address());
        }
        account
    }

    /// Find the sandbox faucet: the first key of the default wallet whose
    /// account is online and was funded in the genesis block.
    pub async fn find_faucet(&self) -> HarnessResult<Account> {
        let wallets = self.wallet.list_wallets().await?;
        let wallet = wallets
            .wallets
            .first()
            .ok_or(HarnessError::FaucetNotFound)?;

        let handle = self
            .wallet
            .init_wallet_handle(&wallet.id, &self.wallet_password)
            .await?;

        let result = self.find_faucet_in_wallet(&handle).await;
        if let Err(e) = self.wallet.release_wallet_handle(&handle).await {
            warn!("Cannot release wallet handle: {}", e);
        }

        let faucet = result?;
        info!("Using faucet {}", faucet.address());
        Ok(faucet)
    }

    async fn find_faucet_in_wallet(&self, handle: &str) -> HarnessResult<Account> {
        let keys = self.wallet.list_keys(handle).await?;
        for address in &keys.addresses {
            let account = match self.indexer.account_info(address).await {
                Ok(response) => response.account,
                // Not indexed yet
                Err(ClientError::NotFound(_)) => continue,
                Err(e) => return Err(e.into()),
            };

            if log::log_enabled!(log::Level::Trace) {
                log::trace!(
                    "Candidate {}: status {}, created at round {:?}",
                    address,
                    account.status,
                    account.created_at_round
                );
            }

            if account.is_online() && account.is_genesis() {
                let exported = self
                    .wallet
                    .export_key(handle, &self.wallet_password, address)
                    .await?;
                let keypair = KeyPair::from_exported(&exported)?;
                return Ok(Account::from_keypair(keypair));
            }
        }

        Err(HarnessError::FaucetNotFound)
    }

    pub async fn fund(
        &self,
        source: &Account,
        destination: &Account,
        amount: u64,
    ) -> HarnessResult<PendingTransaction> {
        let transaction = self.submitter.suggested_params().await?.payment(
            *source.address(),
            *destination.address(),
            amount,
        );
        let info = self.submitter.submit_and_confirm(source, transaction).await?;
        if log::log_enabled!(log::Level::Debug) {
            debug!(
                "Funded {} with {} microAlgos from {}",
                destination.address(),
                amount,
                source.address()
            );
        }
        Ok(info)
    }

    // New account holding the configured funding amount
    pub async fn create_and_fund(&self, faucet: &Account) -> HarnessResult<Account> {
        let account = self.create_account();
        self.fund(faucet, &account, self.funding_amount).await?;
        Ok(account)
    }
}
