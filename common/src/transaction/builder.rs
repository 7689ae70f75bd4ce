//! Build unsigned transactions from the node's suggested parameters.

use crate::{
    api::algod::SuggestedParams,
    config::{FLAT_FEE, VALIDITY_WINDOW},
    crypto::{Address, Hash},
};

use super::{
    ApplicationCall, AssetConfig, AssetParams, Header, Payment, StateSchema, Transaction,
    TransactionPayload,
};

/// Fills the shared header fields of every transaction.
///
/// The fee is always flat (never per byte) and the validity window starts at
/// the node's last round.
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    fee: u64,
    first_valid: u64,
    last_valid: u64,
    genesis_id: String,
    genesis_hash: Hash,
    note: Vec<u8>,
}

impl TransactionBuilder {
    pub fn new(params: &SuggestedParams) -> Self {
        Self {
            fee: FLAT_FEE.max(params.min_fee),
            first_valid: params.last_round,
            last_valid: params.last_round + VALIDITY_WINDOW,
            genesis_id: params.genesis_id.clone(),
            genesis_hash: params.genesis_hash,
            note: Vec::new(),
        }
    }

    pub fn with_fee(mut self, fee: u64) -> Self {
        self.fee = fee;
        self
    }

    pub fn with_note(mut self, note: Vec<u8>) -> Self {
        self.note = note;
        self
    }

    pub fn build(&self, sender: Address, payload: TransactionPayload) -> Transaction {
        let header = Header {
            sender,
            fee: self.fee,
            first_valid: self.first_valid,
            last_valid: self.last_valid,
            genesis_id: self.genesis_id.clone(),
            genesis_hash: self.genesis_hash,
            note: self.note.clone(),
        };
        Transaction::new(header, payload)
    }

    pub fn payment(&self, sender: Address, receiver: Address, amount: u64) -> Transaction {
        self.build(
            sender,
            TransactionPayload::Payment(Payment::new(receiver, amount)),
        )
    }

    pub fn asset_create(&self, sender: Address, params: AssetParams) -> Transaction {
        self.build(
            sender,
            TransactionPayload::AssetConfig(AssetConfig::create(params)),
        )
    }

    pub fn application_create(
        &self,
        sender: Address,
        approval_program: Vec<u8>,
        clear_program: Vec<u8>,
        global_schema: StateSchema,
        local_schema: StateSchema,
    ) -> Transaction {
        self.build(
            sender,
            TransactionPayload::ApplicationCall(ApplicationCall::create(
                approval_program,
                clear_program,
                global_schema,
                local_schema,
            )),
        )
    }

    pub fn application_call(&self, sender: Address, call: ApplicationCall) -> Transaction {
        self.build(sender, TransactionPayload::ApplicationCall(call))
    }
}
