use super::{builder::TransactionBuilder, *};
use crate::{
    account::{Account, LogicSig},
    api::algod::SuggestedParams,
    crypto::{KeyPair, SecretKey},
    serializer::Reader,
};

fn params() -> SuggestedParams {
    SuggestedParams {
        consensus_version: "future".to_owned(),
        fee: 0,
        genesis_hash: Hash::new([7u8; 32]),
        genesis_id: "sandnet-v1".to_owned(),
        last_round: 100,
        min_fee: 1000,
    }
}

#[test]
fn test_builder_fills_header() {
    let sender = Account::generate();
    let tx = TransactionBuilder::new(&params()).payment(*sender.address(), Address::zero(), 10);

    let header = tx.get_header();
    assert_eq!(header.fee, 1000);
    assert_eq!(header.first_valid, 100);
    assert_eq!(header.last_valid, 1100);
    assert_eq!(header.genesis_id, "sandnet-v1");
    assert_eq!(tx.get_type(), TransactionType::Payment);
}

#[test]
fn test_encoding_is_canonical() {
    let sender = Account::generate();
    let tx = TransactionBuilder::new(&params()).payment(*sender.address(), Address::zero(), 10);
    let value = Reader::read_all(&tx.to_bytes()).unwrap();

    let keys: Vec<&str> = value
        .as_map()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    // Zero receiver and empty note are omitted
    assert_eq!(keys, ["amt", "fee", "fv", "gen", "gh", "lv", "snd", "type"]);
    assert_eq!(value.get("type").and_then(Value::as_str), Some("pay"));
    assert_eq!(value.get("amt").and_then(Value::as_uint), Some(10));
}

#[test]
fn test_txid_covers_prefixed_encoding() {
    let sender = Account::generate();
    let tx = TransactionBuilder::new(&params()).payment(*sender.address(), Address::zero(), 10);

    let id = tx.id();
    assert_eq!(*id.as_hash(), hash_with_prefix(b"TX", &tx.to_bytes()));

    let rendered = id.to_string();
    assert_eq!(rendered.len(), 52);
    assert_eq!(rendered.parse::<TxId>().unwrap(), id);

    // Any field change yields another id
    let other = TransactionBuilder::new(&params()).payment(*sender.address(), Address::zero(), 11);
    assert_ne!(other.id(), id);
}

#[test]
fn test_signed_transaction_encoding() {
    let keypair = KeyPair::generate();
    let account = Account::from_keypair(keypair);
    let tx = TransactionBuilder::new(&params()).payment(*account.address(), Address::zero(), 1);
    let signed = account.sign(tx.clone()).unwrap();
    assert_eq!(signed.id(), tx.id());

    let value = Reader::read_all(&signed.to_bytes()).unwrap();
    let signature = value.get("sig").and_then(Value::as_bytes).unwrap();
    assert_eq!(signature.len(), 64);
    assert!(value.get("sgnr").is_none());
    assert_eq!(value.get("txn"), Some(&tx.to_value()));
}

#[test]
fn test_delegated_logic_sig_sets_no_auth_address() {
    let keypair = KeyPair::generate();
    let logic_sig = LogicSig::new(vec![0x05, 0x81, 0x01], Vec::new()).delegate(&keypair);
    let account = Account::from_logic_sig(logic_sig);
    assert_eq!(*account.address(), keypair.address());

    let tx = TransactionBuilder::new(&params()).payment(keypair.address(), Address::zero(), 1);
    let value = Reader::read_all(&account.sign(tx).unwrap().to_bytes()).unwrap();
    let lsig = value.get("lsig").unwrap();
    assert!(lsig.get("sig").is_some());
    assert!(value.get("sig").is_none());
}

#[test]
fn test_authorizer_other_than_sender_sets_sgnr() {
    let tx = TransactionBuilder::new(&params()).payment(Address::zero(), Address::zero(), 1);
    let keypair = KeyPair::generate();
    let signature = keypair.sign(&tx.bytes_to_sign());
    let signed = SignedTransaction::new(tx, Authorization::Signature(signature), keypair.address());

    assert_eq!(signed.get_auth_address(), Some(&keypair.address()));
    let value = Reader::read_all(&signed.to_bytes()).unwrap();
    assert_eq!(
        value.get("sgnr").and_then(Value::as_bytes),
        Some(&keypair.address().as_bytes()[..])
    );
}

#[test]
fn test_application_call_fields() {
    let target = Account::generate();
    let call = ApplicationCall::no_op(9, vec![b"AsaAmountEq".to_vec(), 1u64.to_be_bytes().to_vec()])
        .with_accounts(vec![*target.address()])
        .with_foreign_assets(vec![12]);
    assert_eq!(call.method(), Some(&b"AsaAmountEq"[..]));
    assert!(!call.is_creation());

    let tx = TransactionBuilder::new(&params()).application_call(*target.address(), call);
    let value = tx.to_value();
    assert_eq!(value.get("type").and_then(Value::as_str), Some("appl"));
    assert_eq!(value.get("apid").and_then(Value::as_uint), Some(9));
    // NoOp and empty schemas are omitted
    assert!(value.get("apan").is_none());
    assert!(value.get("apgs").is_none());
    assert_eq!(value.get("apaa").and_then(Value::as_array).map(|a| a.len()), Some(2));
    assert_eq!(
        value.get("apas").and_then(Value::as_array),
        Some(&[Value::Uint(12)][..])
    );
}

#[test]
fn test_asset_creation_fields() {
    let creator = Account::generate();
    let asset = AssetParams::owned_by(creator.address(), 1, 0, "TST", "Test ASA");
    let tx = TransactionBuilder::new(&params()).asset_create(*creator.address(), asset);
    let value = tx.to_value();

    assert_eq!(value.get("type").and_then(Value::as_str), Some("acfg"));
    assert!(value.get("caid").is_none());
    let apar = value.get("apar").unwrap();
    assert_eq!(apar.get("t").and_then(Value::as_uint), Some(1));
    assert_eq!(apar.get("un").and_then(Value::as_str), Some("TST"));
    assert!(apar.get("dc").is_none());
    assert_eq!(
        apar.get("m").and_then(Value::as_bytes),
        Some(&creator.address().as_bytes()[..])
    );
}

// Vectors computed outside this crate with the SDK packing rules. Sender is
// RFC 8032 test key 1, genesis is testnet
const GOLDEN_SEED: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
const GOLDEN_SENDER: &str = "25NJQAMCWEFLPVKL73J4SZAHHIHOC4XT3KTCGJNPAINGR5YHKENMEF5QTE";
const GOLDEN_RECEIVER: &str = "CEIRCEIRCEIRCEIRCEIRCEIRCEIRCEIRCEIRCEIRCEIRCEIRCEI7JH2AYM";

const GOLDEN_PAY: &str = concat!(
    "8aa3616d74ce004c4b40a3666565cd03e8a26676ce01406f40a367656eac7465",
    "73746e65742d76312e30a26768c4204863b518a4b3c84ec810f22d4f1081cb0f",
    "71f059a7ac20dec62f7f70e5093a22a26c76ce01407328a46e6f7465c40c6173",
    "61206f62736572766572a3726376c42011111111111111111111111111111111",
    "11111111111111111111111111111111a3736e64c420d75a980182b10ab7d54b",
    "fed3c964073a0ee172f3daa62325af021a68f707511aa474797065a3706179",
);
const GOLDEN_PAY_SIGNED: &str = concat!(
    "82a3736967c4404c12123d62902c92e4af1fb0b281c879ee6a30d5c244ec4a62",
    "e6fc1ac3bedf4b3432dca1949ad9316845cdea1b20da2e2e8d67ed87273cb220",
    "a4f241e7e3b20fa374786e8aa3616d74ce004c4b40a3666565cd03e8a26676ce",
    "01406f40a367656eac746573746e65742d76312e30a26768c4204863b518a4b3",
    "c84ec810f22d4f1081cb0f71f059a7ac20dec62f7f70e5093a22a26c76ce0140",
    "7328a46e6f7465c40c617361206f62736572766572a3726376c4201111111111",
    "111111111111111111111111111111111111111111111111111111a3736e64c4",
    "20d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f70751",
    "1aa474797065a3706179",
);
const GOLDEN_PAY_ID: &str = "JRILMRYHQL5S2M25ACSZF7YJ4Z6FL6DHXZMH7WUH5JPPSJIMYIKQ";

const GOLDEN_APPL: &str = concat!(
    "8ba46170616192c40b417361416d6f756e744571c4080000000000000001a461",
    "70617391cd162ea46170617491c4201111111111111111111111111111111111",
    "111111111111111111111111111111a461706964cd04d2a3666565cd03e8a266",
    "76ce01406f40a367656eac746573746e65742d76312e30a26768c4204863b518",
    "a4b3c84ec810f22d4f1081cb0f71f059a7ac20dec62f7f70e5093a22a26c76ce",
    "01407328a3736e64c420d75a980182b10ab7d54bfed3c964073a0ee172f3daa6",
    "2325af021a68f707511aa474797065a46170706c",
);
const GOLDEN_APPL_SIGNED: &str = concat!(
    "82a3736967c440705bbb5e94db147b73ea044850dd4ba506ad5b0ebb4debb642",
    "ef9de4814b00b4fe65428472a4b986c64a1aad91b50d4ad22ae934d42f928c6c",
    "91a7909ad7860aa374786e8ba46170616192c40b417361416d6f756e744571c4",
    "080000000000000001a46170617391cd162ea46170617491c420111111111111",
    "1111111111111111111111111111111111111111111111111111a461706964cd",
    "04d2a3666565cd03e8a26676ce01406f40a367656eac746573746e65742d7631",
    "2e30a26768c4204863b518a4b3c84ec810f22d4f1081cb0f71f059a7ac20dec6",
    "2f7f70e5093a22a26c76ce01407328a3736e64c420d75a980182b10ab7d54bfe",
    "d3c964073a0ee172f3daa62325af021a68f707511aa474797065a46170706c",
);
const GOLDEN_APPL_ID: &str = "NCBRZJ6MMLTR62GDZ4SAPSUGBP6T6YAAUIDDWKE76QRQUCDZ2Q3Q";

fn golden_account() -> Account {
    let seed = hex::decode(GOLDEN_SEED).unwrap();
    let secret = SecretKey::from_slice(&seed).unwrap();
    Account::from_keypair(KeyPair::from_secret(&secret))
}

fn golden_builder() -> TransactionBuilder {
    TransactionBuilder::new(&SuggestedParams {
        consensus_version: "future".to_owned(),
        fee: 0,
        genesis_hash: Hash::from_base64("SGO1GKSzyE7IEPItTxCByw9x8FmnrCDexi9/cOUJOiI=").unwrap(),
        genesis_id: "testnet-v1.0".to_owned(),
        last_round: 21_000_000,
        min_fee: 1000,
    })
}

#[test]
fn test_golden_payment() {
    let sender = golden_account();
    assert_eq!(sender.address().to_string(), GOLDEN_SENDER);
    let receiver: Address = GOLDEN_RECEIVER.parse().unwrap();
    assert_eq!(receiver, Address::new([0x11; 32]));

    let tx = golden_builder()
        .with_note(b"asa observer".to_vec())
        .payment(*sender.address(), receiver, 5_000_000);
    assert_eq!(hex::encode(tx.to_bytes()), GOLDEN_PAY);
    assert_eq!(tx.id().to_string(), GOLDEN_PAY_ID);

    let signed = sender.sign(tx).unwrap();
    assert_eq!(hex::encode(signed.to_bytes()), GOLDEN_PAY_SIGNED);
}

#[test]
fn test_golden_application_call() {
    let sender = golden_account();
    let target: Address = GOLDEN_RECEIVER.parse().unwrap();
    let call = ApplicationCall::no_op(
        1234,
        vec![b"AsaAmountEq".to_vec(), 1u64.to_be_bytes().to_vec()],
    )
    .with_accounts(vec![target])
    .with_foreign_assets(vec![5678]);

    let tx = golden_builder().application_call(*sender.address(), call);
    assert_eq!(hex::encode(tx.to_bytes()), GOLDEN_APPL);
    assert_eq!(tx.id().to_string(), GOLDEN_APPL_ID);

    let signed = sender.sign(tx).unwrap();
    assert_eq!(hex::encode(signed.to_bytes()), GOLDEN_APPL_SIGNED);
}
