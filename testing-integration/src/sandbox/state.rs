use std::{
    collections::{BTreeMap, HashMap},
    str::FromStr,
};

use asa_common::{
    api::{
        algod::{PendingTransaction, SuggestedParams},
        indexer::{AccountInfo, AssetHolding},
    },
    config::{FLAT_FEE, TX_PREFIX},
    crypto::{hash, hash_with_prefix, Address, Hash, KeyPair, Signature},
    rpc::ClientError,
    serializer::{Reader, Serializer, Value},
    transaction::{OnComplete, TransactionType, TxId},
};

use crate::contract::Method;

pub const GENESIS_ID: &str = "sandnet-v1";
pub const OFFLINE_STATUS: &str = "Offline";

// Program evaluation refused the transaction
fn rejected<S: Into<String>>(message: S) -> ClientError {
    ClientError::Rejected {
        message: message.into(),
    }
}

// Structural, signature, fee or balance failure, answered as algod does
fn refused<S: Into<String>>(message: S) -> ClientError {
    ClientError::Http {
        status: 400,
        message: message.into(),
    }
}

fn uint(value: &Value, key: &str) -> u64 {
    value.get(key).and_then(Value::as_uint).unwrap_or(0)
}

fn bytes<'v>(value: &'v Value, key: &str) -> &'v [u8] {
    value.get(key).and_then(Value::as_bytes).unwrap_or(&[])
}

fn array<'v>(value: &'v Value, key: &str) -> &'v [Value] {
    value.get(key).and_then(Value::as_array).unwrap_or(&[])
}

fn address(value: &Value, key: &str) -> Result<Address, ClientError> {
    let bytes = bytes(value, key);
    if bytes.is_empty() {
        return Ok(Address::zero());
    }
    Address::from_slice(bytes).map_err(|e| refused(format!("invalid {key}: {e}")))
}

#[derive(Debug, Clone)]
pub(super) struct SandboxAccount {
    pub amount: u64,
    pub status: String,
    pub created_at_round: u64,
    pub assets: BTreeMap<u64, u64>,
}

impl SandboxAccount {
    fn new(amount: u64, status: &str, created_at_round: u64) -> Self {
        Self {
            amount,
            status: status.to_owned(),
            created_at_round,
            assets: BTreeMap::new(),
        }
    }

    fn info(&self, address: Address) -> AccountInfo {
        AccountInfo {
            address,
            amount: self.amount,
            status: self.status.clone(),
            created_at_round: Some(self.created_at_round),
            assets: self
                .assets
                .iter()
                .map(|(asset_id, amount)| AssetHolding {
                    asset_id: *asset_id,
                    amount: *amount,
                    is_frozen: false,
                })
                .collect(),
        }
    }
}

#[derive(Debug)]
pub(super) struct SandboxState {
    pub round: u64,
    pub genesis_hash: Hash,
    pub accounts: HashMap<Address, SandboxAccount>,
    // Keys of the default wallet, in listing order
    pub wallet_keys: Vec<KeyPair>,
    pub wallet_present: bool,
    pub handles: Vec<String>,
    pub next_handle: u64,
    pub pending: HashMap<TxId, PendingTransaction>,
    pub unconfirmed: Vec<TxId>,
    pub applications: HashMap<u64, Address>,
    pub next_index: u64,
    pub submissions: u64,
    pub approve_everything: bool,
    pub stalled: bool,
    pub evict_next: Option<String>,
}

impl SandboxState {
    pub fn new() -> Self {
        Self {
            round: 1,
            genesis_hash: hash(GENESIS_ID.as_bytes()),
            accounts: HashMap::new(),
            wallet_keys: Vec::new(),
            wallet_present: true,
            handles: Vec::new(),
            next_handle: 0,
            pending: HashMap::new(),
            unconfirmed: Vec::new(),
            applications: HashMap::new(),
            next_index: 1,
            submissions: 0,
            approve_everything: false,
            stalled: false,
            evict_next: None,
        }
    }

    // Wallet key with an account created at `round`
    pub fn add_wallet_account(&mut self, amount: u64, status: &str, round: u64) -> Address {
        let keypair = KeyPair::generate();
        let address = keypair.address();
        self.accounts
            .insert(address, SandboxAccount::new(amount, status, round));
        self.wallet_keys.push(keypair);
        address
    }

    pub fn account_info(&self, address: &Address) -> Option<AccountInfo> {
        self.accounts
            .get(address)
            .map(|account| account.info(*address))
    }

    pub fn suggested_params(&self) -> SuggestedParams {
        SuggestedParams {
            consensus_version: "future".to_owned(),
            fee: 0,
            genesis_hash: self.genesis_hash,
            genesis_id: GENESIS_ID.to_owned(),
            last_round: self.round,
            min_fee: FLAT_FEE,
        }
    }

    pub fn produce_block(&mut self) {
        self.round += 1;
        for tx_id in self.unconfirmed.drain(..) {
            if let Some(info) = self.pending.get_mut(&tx_id) {
                info.confirmed_round = Some(self.round);
            }
        }
    }

    pub fn submit(&mut self, bytes: &[u8]) -> Result<TxId, ClientError> {
        let signed = Reader::read_all(bytes)
            .map_err(|e| refused(format!("msgpack decode error: {e}")))?;
        let txn = signed
            .get("txn")
            .ok_or_else(|| refused("signed transaction has no txn"))?;
        let encoded = txn.to_bytes();
        let tx_id = TxId::new(hash_with_prefix(TX_PREFIX, &encoded));

        if self.pending.contains_key(&tx_id) {
            return Err(refused(format!("transaction already in ledger: {tx_id}")));
        }

        let sender = address(txn, "snd")?;
        let authorizer = match signed.get("sgnr") {
            Some(_) => address(&signed, "sgnr")?,
            None => sender,
        };
        self.verify_authorization(&signed, &encoded, &authorizer)?;
        self.verify_header(txn)?;

        self.submissions += 1;
        if let Some(error) = self.evict_next.take() {
            self.pending.insert(
                tx_id,
                PendingTransaction {
                    pool_error: error,
                    ..Default::default()
                },
            );
            return Ok(tx_id);
        }

        let mut info = PendingTransaction::default();
        let kind = txn
            .get("type")
            .and_then(Value::as_str)
            .and_then(|kind| TransactionType::from_str(kind).ok())
            .ok_or_else(|| refused("unknown transaction type"))?;

        // Validate before touching any balance
        match kind {
            TransactionType::Payment => self.apply_payment(txn, &sender)?,
            TransactionType::AssetConfig => {
                info.asset_index = Some(self.apply_asset_config(txn, &sender)?)
            }
            TransactionType::ApplicationCall => {
                info.application_index = self.apply_application_call(txn, &sender)?
            }
        }

        self.pending.insert(tx_id, info);
        self.unconfirmed.push(tx_id);
        Ok(tx_id)
    }

    fn verify_authorization(
        &self,
        signed: &Value,
        encoded: &[u8],
        authorizer: &Address,
    ) -> Result<(), ClientError> {
        let verify = |message: &[u8], signature: &[u8]| -> Result<(), ClientError> {
            let signature =
                Signature::from_slice(signature).map_err(|e| refused(e.to_string()))?;
            authorizer
                .to_public_key()
                .verify(message, &signature)
                .map_err(|_| refused("signature validation failed"))
        };

        if let Some(lsig) = signed.get("lsig") {
            let program = bytes(lsig, "l");
            if program.is_empty() {
                return Err(refused("logic sig has no program"));
            }
            return match lsig.get("sig") {
                Some(_) => {
                    let mut message = b"Program".to_vec();
                    message.extend_from_slice(program);
                    verify(&message, bytes(lsig, "sig"))
                }
                None if Address::for_program(program) == *authorizer => Ok(()),
                None => Err(refused("logic sig does not control the sender")),
            };
        }

        let signature = bytes(signed, "sig");
        if signature.is_empty() {
            return Err(refused("transaction is not signed"));
        }
        let mut message = TX_PREFIX.to_vec();
        message.extend_from_slice(encoded);
        verify(&message, signature)
    }

    fn verify_header(&self, txn: &Value) -> Result<(), ClientError> {
        if bytes(txn, "gh") != self.genesis_hash.as_bytes() {
            return Err(refused("genesis hash mismatch"));
        }
        let genesis_id = txn.get("gen").and_then(Value::as_str).unwrap_or("");
        if !genesis_id.is_empty() && genesis_id != GENESIS_ID {
            return Err(refused(format!("genesis id mismatch: {genesis_id}")));
        }

        let next_round = self.round + 1;
        let (first_valid, last_valid) = (uint(txn, "fv"), uint(txn, "lv"));
        if first_valid > next_round || last_valid < next_round {
            return Err(refused(format!(
                "txn dead: round {next_round} outside of {first_valid}--{last_valid}"
            )));
        }

        if uint(txn, "fee") < FLAT_FEE {
            return Err(refused("transaction had fee smaller than min"));
        }
        Ok(())
    }

    fn charge(&mut self, sender: &Address, amount: u64) -> Result<(), ClientError> {
        let account = self
            .accounts
            .get_mut(sender)
            .ok_or_else(|| refused(format!("account {sender} does not exist")))?;
        account.amount = account
            .amount
            .checked_sub(amount)
            .ok_or_else(|| refused(format!("overspend (account {sender})")))?;
        Ok(())
    }

    fn ensure_funds(&self, sender: &Address, amount: u64) -> Result<(), ClientError> {
        match self.accounts.get(sender) {
            Some(account) if account.amount >= amount => Ok(()),
            Some(_) => Err(refused(format!("overspend (account {sender})"))),
            None => Err(refused(format!("account {sender} does not exist"))),
        }
    }

    fn apply_payment(&mut self, txn: &Value, sender: &Address) -> Result<(), ClientError> {
        let fee = uint(txn, "fee");
        let amount = uint(txn, "amt");
        let receiver = address(txn, "rcv")?;
        let close_to = address(txn, "close")?;

        self.ensure_funds(sender, fee.saturating_add(amount))?;
        self.charge(sender, fee + amount)?;

        let created_at = self.round + 1;
        self.accounts
            .entry(receiver)
            .or_insert_with(|| SandboxAccount::new(0, OFFLINE_STATUS, created_at))
            .amount += amount;

        if !close_to.is_zero() {
            if let Some(closed) = self.accounts.remove(sender) {
                self.accounts
                    .entry(close_to)
                    .or_insert_with(|| SandboxAccount::new(0, OFFLINE_STATUS, created_at))
                    .amount += closed.amount;
            }
        }
        Ok(())
    }

    fn apply_asset_config(&mut self, txn: &Value, sender: &Address) -> Result<u64, ClientError> {
        if uint(txn, "caid") != 0 {
            return Err(refused("asset reconfiguration is not supported"));
        }
        let params = txn
            .get("apar")
            .ok_or_else(|| refused("asset creation without parameters"))?;
        let total = uint(params, "t");
        if total == 0 {
            return Err(refused("asset total must be positive"));
        }

        self.charge(sender, uint(txn, "fee"))?;
        let asset_id = self.allocate_index();
        if let Some(account) = self.accounts.get_mut(sender) {
            account.assets.insert(asset_id, total);
        }
        Ok(asset_id)
    }

    fn apply_application_call(
        &mut self,
        txn: &Value,
        sender: &Address,
    ) -> Result<Option<u64>, ClientError> {
        let fee = uint(txn, "fee");
        let app_id = uint(txn, "apid");

        if app_id == 0 {
            if bytes(txn, "apap").is_empty() || bytes(txn, "apsu").is_empty() {
                return Err(refused("application creation without programs"));
            }
            self.charge(sender, fee)?;
            let app_id = self.allocate_index();
            self.applications.insert(app_id, *sender);
            return Ok(Some(app_id));
        }

        if !self.applications.contains_key(&app_id) {
            return Err(refused(format!("application {app_id} does not exist")));
        }
        self.ensure_funds(sender, fee)?;
        self.evaluate_observer(txn)
            .map_err(|reason| rejected(format!("logic eval error: {reason}. Details: app={app_id}")))?;
        self.charge(sender, fee)?;
        Ok(None)
    }

    // Same verdicts as the observer's approval program
    fn evaluate_observer(&self, txn: &Value) -> Result<(), String> {
        if self.approve_everything {
            return Ok(());
        }

        if uint(txn, "apan") != OnComplete::NoOp as u64 {
            return Err("assert failed pc=12".to_owned());
        }

        let target = array(txn, "apat")
            .first()
            .and_then(Value::as_bytes)
            .ok_or_else(|| "invalid Accounts index 1".to_owned())?;
        let target = Address::from_slice(target).map_err(|e| e.to_string())?;
        let asset_id = array(txn, "apas")
            .first()
            .and_then(Value::as_uint)
            .ok_or_else(|| "invalid Assets index 0".to_owned())?;

        let args = array(txn, "apaa");
        let method = args
            .first()
            .and_then(Value::as_bytes)
            .and_then(|name| std::str::from_utf8(name).ok())
            .and_then(|name| Method::from_str(name).ok())
            .ok_or_else(|| "rejected by logic".to_owned())?;

        let amount = if method.takes_amount() {
            let raw = match args {
                [_, amount] => amount.as_bytes().unwrap_or(&[]),
                _ => return Err("assert failed".to_owned()),
            };
            if raw.len() > 8 {
                return Err("btoi arg too long".to_owned());
            }
            raw.iter().fold(0u64, |acc, byte| (acc << 8) | *byte as u64)
        } else {
            0
        };

        let holding = self
            .accounts
            .get(&target)
            .and_then(|account| account.assets.get(&asset_id))
            .copied();

        if method.evaluate(holding, amount) {
            Ok(())
        } else {
            Err("rejected by logic".to_owned())
        }
    }

    fn allocate_index(&mut self) -> u64 {
        let index = self.next_index;
        self.next_index += 1;
        index
    }
}
