use std::path::Path;

use asa_common::{
    account::Account,
    api::algod::PendingTransaction,
    rpc::LedgerClient,
    serializer::Serializer,
    transaction::{builder::TransactionBuilder, AssetParams, SignedTransaction, Transaction},
};
use log::{debug, info, trace};

use crate::{
    config::ArtifactPaths,
    contract::Contract,
    error::{HarnessError, HarnessResult},
};

use super::{wait_for_confirmation, ConfirmationPolicy};

/// Signs, submits and confirms transactions against the ledger.
///
/// Every submission first overwrites the signed transaction backup, so at
/// most one submission may be in flight.
pub struct Submitter<'a> {
    ledger: &'a dyn LedgerClient,
    policy: ConfirmationPolicy,
    artifacts: ArtifactPaths,
    fee: u64,
}

impl<'a> Submitter<'a> {
    pub fn new(
        ledger: &'a dyn LedgerClient,
        policy: ConfirmationPolicy,
        artifacts: ArtifactPaths,
        fee: u64,
    ) -> Self {
        Self {
            ledger,
            policy,
            artifacts,
            fee,
        }
    }

    // Header template valid from the node's last round, flat fee
    pub async fn suggested_params(&self) -> HarnessResult<TransactionBuilder> {
        let params = self.ledger.suggested_params().await?;
        Ok(TransactionBuilder::new(&params).with_fee(self.fee))
    }

    pub fn sign(
        &self,
        account: &Account,
        transaction: Transaction,
    ) -> HarnessResult<SignedTransaction> {
        Ok(account.sign(transaction)?)
    }

    pub async fn submit_and_confirm(
        &self,
        account: &Account,
        transaction: Transaction,
    ) -> HarnessResult<PendingTransaction> {
        let signed = self.sign(account, transaction)?;
        self.submit_signed(&signed).await
    }

    pub async fn submit_signed(
        &self,
        signed: &SignedTransaction,
    ) -> HarnessResult<PendingTransaction> {
        let bytes = signed.to_bytes();
        if log::log_enabled!(log::Level::Trace) {
            trace!("Signed transaction {}: {}", signed.id(), hex::encode(&bytes));
        }
        write_artifact(&self.artifacts.signed_transaction, &bytes).await?;

        let tx_id = self.ledger.send_raw_transaction(&bytes).await?;
        if log::log_enabled!(log::Level::Debug) {
            debug!(
                "Submitted {} transaction {}",
                signed.get_transaction().get_type(),
                tx_id
            );
        }

        wait_for_confirmation(self.ledger, &tx_id, &self.policy).await
    }

    pub async fn compile_program(&self, source: &str) -> HarnessResult<Vec<u8>> {
        let response = self.ledger.compile(source).await?;
        if log::log_enabled!(log::Level::Debug) {
            debug!(
                "Compiled program {} ({} bytes)",
                response.hash,
                response.result.len()
            );
        }
        Ok(response.result)
    }

    /// Deploy the contract and return its application id.
    ///
    /// Program sources are written next to the signed transaction backup.
    pub async fn create_application(
        &self,
        creator: &Account,
        contract: &Contract,
    ) -> HarnessResult<u64> {
        write_artifact(
            &self.artifacts.approval_program,
            contract.approval_source.as_bytes(),
        )
        .await?;
        write_artifact(
            &self.artifacts.clear_program,
            contract.clear_source.as_bytes(),
        )
        .await?;

        let approval = self.compile_program(contract.approval_source).await?;
        let clear = self.compile_program(contract.clear_source).await?;

        let transaction = self.suggested_params().await?.application_create(
            *creator.address(),
            approval,
            clear,
            contract.global_schema,
            contract.local_schema,
        );
        let info = self.submit_and_confirm(creator, transaction).await?;
        let app_id = info
            .application_index
            .ok_or(HarnessError::MissingField("application-index"))?;

        info!("Created application {}", app_id);
        Ok(app_id)
    }

    pub async fn create_asset(&self, creator: &Account, params: AssetParams) -> HarnessResult<u64> {
        let unit_name = params.unit_name.clone();
        let transaction = self
            .suggested_params()
            .await?
            .asset_create(*creator.address(), params);
        let info = self.submit_and_confirm(creator, transaction).await?;
        let asset_id = info
            .asset_index
            .ok_or(HarnessError::MissingField("asset-index"))?;

        info!("Created asset {} ({})", asset_id, unit_name);
        Ok(asset_id)
    }
}

async fn write_artifact(path: &Path, bytes: &[u8]) -> HarnessResult<()> {
    tokio::fs::write(path, bytes)
        .await
        .map_err(|source| HarnessError::Io {
            path: path.to_path_buf(),
            source,
        })
}
