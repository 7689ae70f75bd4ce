//! Individual harness steps against the in-memory sandbox.

use asa_common::{
    account::{Account, LogicSig},
    config::algos_to_microalgos,
    crypto::Address,
    rpc::ClientError,
    serializer::{Reader, Serializer},
    transaction::AssetParams,
};
use asa_testing_integration::{
    contract::{observer_call, Contract, Method},
    harness::{Classifier, Outcome, Provisioner, Submitter, TestStats},
    ArtifactPaths, ConfirmationPolicy, HarnessError, SandboxLedger,
};

fn submitter<'a>(sandbox: &'a SandboxLedger, dir: &tempfile::TempDir) -> Submitter<'a> {
    Submitter::new(
        sandbox,
        ConfirmationPolicy::default(),
        ArtifactPaths::in_dir(dir.path()),
        1000,
    )
}

#[tokio::test]
async fn test_find_faucet_skips_other_accounts() {
    let dir = tempfile::tempdir().unwrap();
    let sandbox = SandboxLedger::new();
    let submitter = submitter(&sandbox, &dir);
    let provisioner = Provisioner::new(&sandbox, &sandbox, &submitter, String::new(), 0);

    let faucet = provisioner.find_faucet().await.unwrap();
    assert!(faucet.can_sign());
    assert_eq!(Some(*faucet.address()), sandbox.faucet_address());
    assert_eq!(sandbox.open_handles(), 0);
}

#[tokio::test]
async fn test_find_faucet_without_wallet() {
    let dir = tempfile::tempdir().unwrap();
    let sandbox = SandboxLedger::without_wallet();
    let submitter = submitter(&sandbox, &dir);
    let provisioner = Provisioner::new(&sandbox, &sandbox, &submitter, String::new(), 0);

    let err = provisioner.find_faucet().await.unwrap_err();
    assert!(matches!(err, HarnessError::FaucetNotFound));
}

#[tokio::test]
async fn test_wrong_wallet_password_is_not_rejection() {
    let dir = tempfile::tempdir().unwrap();
    let sandbox = SandboxLedger::new();
    let submitter = submitter(&sandbox, &dir);
    let provisioner =
        Provisioner::new(&sandbox, &sandbox, &submitter, "hunter2".to_owned(), 0);

    let err = provisioner.find_faucet().await.unwrap_err();
    assert!(matches!(err, HarnessError::Client(_)));
    assert!(!err.is_rejection());
}

#[tokio::test]
async fn test_create_and_fund() {
    let dir = tempfile::tempdir().unwrap();
    let sandbox = SandboxLedger::new();
    let submitter = submitter(&sandbox, &dir);
    let provisioner = Provisioner::new(
        &sandbox,
        &sandbox,
        &submitter,
        String::new(),
        algos_to_microalgos(1000),
    );

    let fresh = provisioner.create_account();
    assert!(sandbox.account(fresh.address()).is_none());

    let faucet = provisioner.find_faucet().await.unwrap();
    let before = sandbox.account(faucet.address()).unwrap().amount;
    let account = provisioner.create_and_fund(&faucet).await.unwrap();

    let funded = sandbox.account(account.address()).unwrap();
    assert_eq!(funded.amount, 1_000_000_000);
    let after = sandbox.account(faucet.address()).unwrap().amount;
    assert_eq!(before - after, 1_000_000_000 + 1000);
}

#[tokio::test]
async fn test_fund_returns_confirmed_record() {
    let dir = tempfile::tempdir().unwrap();
    let sandbox = SandboxLedger::new();
    let submitter = submitter(&sandbox, &dir);
    let provisioner = Provisioner::new(&sandbox, &sandbox, &submitter, String::new(), 0);

    let faucet = provisioner.find_faucet().await.unwrap();
    let destination = provisioner.create_account();
    let round = sandbox.current_round();
    let info = provisioner
        .fund(&faucet, &destination, 5_000_000)
        .await
        .unwrap();

    assert!(info.is_confirmed());
    assert!(info.confirmed_round.unwrap() > round);
    assert_eq!(sandbox.account(destination.address()).unwrap().amount, 5_000_000);
}

#[tokio::test]
async fn test_address_only_account_cannot_submit() {
    let dir = tempfile::tempdir().unwrap();
    let sandbox = SandboxLedger::new();
    let submitter = submitter(&sandbox, &dir);

    let watched = Account::watch(sandbox.faucet_address().unwrap());
    let transaction = submitter
        .suggested_params()
        .await
        .unwrap()
        .payment(*watched.address(), Address::zero(), 1);

    let err = submitter
        .submit_and_confirm(&watched, transaction)
        .await
        .unwrap_err();
    assert!(matches!(err, HarnessError::MissingSigner(_)));
    assert_eq!(sandbox.submissions(), 0);
    // Nothing was submitted, so no backup either
    assert!(!dir.path().join("txn.signed").exists());
}

#[tokio::test]
async fn test_overspend_is_not_rejection() {
    let dir = tempfile::tempdir().unwrap();
    let sandbox = SandboxLedger::new();
    let submitter = submitter(&sandbox, &dir);

    let empty = Account::generate();
    let transaction = submitter
        .suggested_params()
        .await
        .unwrap()
        .payment(*empty.address(), Address::zero(), 1);
    let err = submitter
        .submit_and_confirm(&empty, transaction)
        .await
        .unwrap_err();
    assert!(!err.is_rejection());
    match err {
        HarnessError::Client(ClientError::Http { status, message }) => {
            assert_eq!(status, 400);
            assert!(message.contains("overspend"));
        }
        err => panic!("unexpected error: {err}"),
    }
}

#[tokio::test]
async fn test_backup_holds_last_signed_transaction() {
    let dir = tempfile::tempdir().unwrap();
    let sandbox = SandboxLedger::new();
    let submitter = submitter(&sandbox, &dir);
    let provisioner = Provisioner::new(&sandbox, &sandbox, &submitter, String::new(), 0);

    let faucet = provisioner.find_faucet().await.unwrap();
    let destination = provisioner.create_account();
    let transaction = submitter
        .suggested_params()
        .await
        .unwrap()
        .payment(*faucet.address(), *destination.address(), 7);
    let signed = submitter.sign(&faucet, transaction).unwrap();
    submitter.submit_signed(&signed).await.unwrap();

    let backup = std::fs::read(dir.path().join("txn.signed")).unwrap();
    assert_eq!(backup, signed.to_bytes());
    let decoded = Reader::read_all(&backup).unwrap();
    assert!(decoded.get("sig").is_some());
}

#[tokio::test]
async fn test_pool_eviction_is_not_rejection() {
    let dir = tempfile::tempdir().unwrap();
    let sandbox = SandboxLedger::new();
    let submitter = submitter(&sandbox, &dir);
    let provisioner = Provisioner::new(&sandbox, &sandbox, &submitter, String::new(), 0);

    let faucet = provisioner.find_faucet().await.unwrap();
    sandbox.evict_next_submission("transaction pool is full");
    let err = provisioner
        .fund(&faucet, &provisioner.create_account(), 1_000_000)
        .await
        .unwrap_err();
    assert!(!err.is_rejection());
    assert!(matches!(err, HarnessError::Evicted { .. }));
}

#[tokio::test]
async fn test_logic_sig_escrow_payment() {
    let dir = tempfile::tempdir().unwrap();
    let sandbox = SandboxLedger::new();
    let submitter = submitter(&sandbox, &dir);
    let provisioner = Provisioner::new(&sandbox, &sandbox, &submitter, String::new(), 0);

    let program = submitter
        .compile_program("#pragma version 5\nint 1\nreturn\n")
        .await
        .unwrap();
    let escrow = Account::from_logic_sig(LogicSig::new(program, Vec::new()));

    let faucet = provisioner.find_faucet().await.unwrap();
    provisioner.fund(&faucet, &escrow, 2_000_000).await.unwrap();

    let receiver = provisioner.create_account();
    let transaction = submitter
        .suggested_params()
        .await
        .unwrap()
        .payment(*escrow.address(), *receiver.address(), 500_000);
    submitter.submit_and_confirm(&escrow, transaction).await.unwrap();

    assert_eq!(sandbox.account(receiver.address()).unwrap().amount, 500_000);
    assert_eq!(
        sandbox.account(escrow.address()).unwrap().amount,
        2_000_000 - 500_000 - 1000
    );
}

#[tokio::test]
async fn test_compile_requires_version_pragma() {
    let dir = tempfile::tempdir().unwrap();
    let sandbox = SandboxLedger::new();
    let submitter = submitter(&sandbox, &dir);

    let err = submitter.compile_program("int 1").await.unwrap_err();
    assert!(matches!(err, HarnessError::Client(_)));
}

#[tokio::test]
async fn test_classifier_counts_each_call_once() {
    let dir = tempfile::tempdir().unwrap();
    let sandbox = SandboxLedger::new();
    let submitter = submitter(&sandbox, &dir);
    let provisioner = Provisioner::new(
        &sandbox,
        &sandbox,
        &submitter,
        String::new(),
        algos_to_microalgos(10),
    );

    let faucet = provisioner.find_faucet().await.unwrap();
    let deployer = provisioner.create_and_fund(&faucet).await.unwrap();
    let app_id = submitter
        .create_application(&deployer, &Contract::asa_state_observer())
        .await
        .unwrap();
    let asset_id = submitter
        .create_asset(
            &deployer,
            AssetParams::owned_by(deployer.address(), 1, 0, "TST", "Test ASA"),
        )
        .await
        .unwrap();
    assert_ne!(app_id, asset_id);

    let classifier = Classifier::new(&submitter);
    let mut stats = TestStats::new();
    let (submitter_ref, deployer_ref) = (&submitter, &deployer);
    let sign = |method: Method, amount: Option<u64>| async move {
        let target = *deployer_ref.address();
        let call = observer_call(app_id, method, amount, target, asset_id);
        let transaction = submitter_ref
            .suggested_params()
            .await
            .unwrap()
            .application_call(target, call);
        submitter_ref.sign(deployer_ref, transaction).unwrap()
    };

    // Approved call expected to approve
    let call = sign(Method::AsaAmountEq, Some(1)).await;
    let outcome = classifier.expect_approval(&call, &mut stats).await.unwrap();
    assert_eq!(outcome, Outcome::Passed);

    // Rejected call expected to approve
    let call = sign(Method::AsaAmountGt, Some(1)).await;
    let outcome = classifier.expect_approval(&call, &mut stats).await.unwrap();
    assert_eq!(outcome, Outcome::Failed);

    // Rejected call expected to reject
    let call = sign(Method::AsaAmountLt, Some(1)).await;
    let outcome = classifier.expect_rejection(&call, &mut stats).await.unwrap();
    assert_eq!(outcome, Outcome::Passed);

    assert_eq!(stats.approval_unit_tests, 2);
    assert_eq!(stats.rejection_unit_tests, 1);
    assert_eq!(stats.passed_tests, 2);
    assert_eq!(stats.failed_tests, 1);

    // A transport-level failure propagates and is not counted
    sandbox.set_stalled(true);
    let call = sign(Method::AsaOptedIn, None).await;
    let strict = Submitter::new(
        &sandbox,
        ConfirmationPolicy {
            max_rounds: 1,
            ..Default::default()
        },
        ArtifactPaths::in_dir(dir.path()),
        1000,
    );
    let err = Classifier::new(&strict)
        .expect_approval(&call, &mut stats)
        .await
        .unwrap_err();
    assert!(matches!(err, HarnessError::ConfirmationTimeout { .. }));
    assert_eq!(stats.total(), 3);
    assert_eq!(stats.passed_tests + stats.failed_tests, 3);
}

#[tokio::test]
async fn test_refused_calls_abort_instead_of_scoring() {
    let dir = tempfile::tempdir().unwrap();
    let sandbox = SandboxLedger::new();
    let submitter = submitter(&sandbox, &dir);
    let provisioner = Provisioner::new(
        &sandbox,
        &sandbox,
        &submitter,
        String::new(),
        algos_to_microalgos(10),
    );

    let faucet = provisioner.find_faucet().await.unwrap();
    let deployer = provisioner.create_and_fund(&faucet).await.unwrap();
    let app_id = submitter
        .create_application(&deployer, &Contract::asa_state_observer())
        .await
        .unwrap();
    let asset_id = submitter
        .create_asset(
            &deployer,
            AssetParams::owned_by(deployer.address(), 1, 0, "TST", "Test ASA"),
        )
        .await
        .unwrap();

    let classifier = Classifier::new(&submitter);
    let mut stats = TestStats::new();
    let target = *deployer.address();

    // The contract would approve this call, but its sender cannot pay the fee
    let unfunded = Account::generate();
    let call = observer_call(app_id, Method::AsaAmountEq, Some(1), target, asset_id);
    let transaction = submitter
        .suggested_params()
        .await
        .unwrap()
        .application_call(*unfunded.address(), call);
    let signed = submitter.sign(&unfunded, transaction).unwrap();
    let err = classifier
        .expect_rejection(&signed, &mut stats)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        HarnessError::Client(ClientError::Http { status: 400, .. })
    ));

    // Approvable call dropped from a full pool
    let call = observer_call(app_id, Method::AsaAmountGe, Some(1), target, asset_id);
    let transaction = submitter
        .suggested_params()
        .await
        .unwrap()
        .application_call(target, call);
    let signed = submitter.sign(&deployer, transaction).unwrap();
    sandbox.evict_next_submission("transaction pool is full");
    let err = classifier
        .expect_rejection(&signed, &mut stats)
        .await
        .unwrap_err();
    assert!(matches!(err, HarnessError::Evicted { .. }));

    assert_eq!(stats, TestStats::new());
}
