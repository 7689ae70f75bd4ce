//! Full observer run: provisioning, deployment and the fixed scenario list.

use asa_common::{
    account::Account,
    crypto::Address,
    rpc::{IndexerClient, LedgerClient, WalletClient},
    transaction::AssetParams,
};
use log::info;

use crate::{
    config::HarnessConfig,
    contract::{observer_call, Contract, Method},
    error::HarnessResult,
    harness::{Classifier, Expectation, Provisioner, Submitter, TestStats},
};

// Test asset: a single indivisible unit held by the deployer
pub const TEST_ASSET_TOTAL: u64 = 1;
pub const TEST_ASSET_DECIMALS: u32 = 0;
pub const TEST_ASSET_UNIT_NAME: &str = "TST";
pub const TEST_ASSET_NAME: &str = "Test ASA";

// Asset id the deployer never opted into
pub const UNKNOWN_ASSET_ID: u64 = 42;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetRef {
    TestAsset,
    Id(u64),
}

/// One observer call and its expected verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scenario {
    pub method: Method,
    pub amount: Option<u64>,
    pub asset: AssetRef,
    pub expectation: Expectation,
}

impl Scenario {
    const fn new(
        method: Method,
        amount: Option<u64>,
        asset: AssetRef,
        expectation: Expectation,
    ) -> Self {
        Self {
            method,
            amount,
            asset,
            expectation,
        }
    }

    const fn approve(method: Method, amount: Option<u64>) -> Self {
        Self::new(method, amount, AssetRef::TestAsset, Expectation::Approval)
    }

    const fn reject(method: Method, amount: Option<u64>) -> Self {
        Self::new(method, amount, AssetRef::TestAsset, Expectation::Rejection)
    }

    pub fn asset_id(&self, test_asset: u64) -> u64 {
        match self.asset {
            AssetRef::TestAsset => test_asset,
            AssetRef::Id(id) => id,
        }
    }
}

/// Calls run against the deployer, which holds the whole test asset supply.
pub const SCENARIOS: [Scenario; 14] = [
    Scenario::approve(Method::AsaOptedIn, None),
    Scenario::approve(Method::AsaAmountEq, Some(1)),
    Scenario::approve(Method::AsaAmountGt, Some(0)),
    Scenario::approve(Method::AsaAmountGe, Some(0)),
    Scenario::approve(Method::AsaAmountGe, Some(1)),
    Scenario::approve(Method::AsaAmountLt, Some(42)),
    Scenario::approve(Method::AsaAmountLe, Some(42)),
    Scenario::approve(Method::AsaAmountLe, Some(1)),
    Scenario::new(
        Method::AsaOptedIn,
        None,
        AssetRef::Id(UNKNOWN_ASSET_ID),
        Expectation::Rejection,
    ),
    Scenario::reject(Method::AsaAmountEq, Some(42)),
    Scenario::reject(Method::AsaAmountGt, Some(1)),
    Scenario::reject(Method::AsaAmountGe, Some(42)),
    Scenario::reject(Method::AsaAmountLt, Some(1)),
    Scenario::reject(Method::AsaAmountLe, Some(0)),
];

/// Drives a complete run against the three services.
pub struct Orchestrator<'a> {
    ledger: &'a dyn LedgerClient,
    wallet: &'a dyn WalletClient,
    indexer: &'a dyn IndexerClient,
    config: HarnessConfig,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        ledger: &'a dyn LedgerClient,
        wallet: &'a dyn WalletClient,
        indexer: &'a dyn IndexerClient,
        config: HarnessConfig,
    ) -> Self {
        Self {
            ledger,
            wallet,
            indexer,
            config,
        }
    }

    pub async fn run(&self) -> HarnessResult<TestStats> {
        let submitter = Submitter::new(
            self.ledger,
            self.config.policy,
            self.config.artifacts.clone(),
            self.config.fee,
        );
        let provisioner = Provisioner::new(
            self.wallet,
            self.indexer,
            &submitter,
            self.config.wallet_password.clone(),
            self.config.funding_amount,
        );

        let faucet = provisioner.find_faucet().await?;
        let deployer = provisioner.create_and_fund(&faucet).await?;
        info!("Deployer account {}", deployer.address());

        let app_id = submitter
            .create_application(&deployer, &Contract::asa_state_observer())
            .await?;

        let params = AssetParams::owned_by(
            deployer.address(),
            TEST_ASSET_TOTAL,
            TEST_ASSET_DECIMALS,
            TEST_ASSET_UNIT_NAME,
            TEST_ASSET_NAME,
        );
        let asset_id = submitter.create_asset(&deployer, params).await?;

        let stats = self
            .run_scenarios(&submitter, &deployer, *deployer.address(), app_id, asset_id)
            .await?;
        info!(
            "Run finished: {} passed, {} failed",
            stats.passed_tests, stats.failed_tests
        );
        Ok(stats)
    }

    async fn run_scenarios(
        &self,
        submitter: &Submitter<'_>,
        caller: &Account,
        target: Address,
        app_id: u64,
        asset_id: u64,
    ) -> HarnessResult<TestStats> {
        let classifier = Classifier::new(submitter);
        let mut stats = TestStats::new();

        for scenario in SCENARIOS.iter() {
            let call = observer_call(
                app_id,
                scenario.method,
                scenario.amount,
                target,
                scenario.asset_id(asset_id),
            );
            // Fresh params keep every call inside its validity window
            let transaction = submitter
                .suggested_params()
                .await?
                .application_call(*caller.address(), call);
            let signed = submitter.sign(caller, transaction)?;

            match scenario.expectation {
                Expectation::Approval => classifier.expect_approval(&signed, &mut stats).await?,
                Expectation::Rejection => classifier.expect_rejection(&signed, &mut stats).await?,
            };
        }

        Ok(stats)
    }
}
