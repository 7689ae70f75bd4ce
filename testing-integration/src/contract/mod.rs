//! The ASA State Observer application: program sources, state schemas and
//! the call layout of its six methods.
//!
//! Each method inspects the holding of the first foreign account in the first
//! foreign asset. Comparisons take the expected amount as the second argument,
//! encoded as 8 bytes big-endian.

use asa_common::{
    crypto::Address,
    transaction::{ApplicationCall, StateSchema},
};
use strum::{AsRefStr, Display, EnumIter, EnumString};

pub const APPROVAL_PROGRAM: &str = include_str!("approval.teal");
pub const CLEAR_PROGRAM: &str = include_str!("clear.teal");

// The observer keeps no state
pub const GLOBAL_SCHEMA: StateSchema = StateSchema::new(0, 0);
pub const LOCAL_SCHEMA: StateSchema = StateSchema::new(0, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString, EnumIter)]
pub enum Method {
    AsaOptedIn,
    AsaAmountEq,
    AsaAmountGt,
    AsaAmountGe,
    AsaAmountLt,
    AsaAmountLe,
}

impl Method {
    pub fn takes_amount(self) -> bool {
        !matches!(self, Method::AsaOptedIn)
    }

    // Outcome of the method against a holding, None when not opted in
    pub fn evaluate(self, holding: Option<u64>, amount: u64) -> bool {
        match (self, holding) {
            (Method::AsaOptedIn, holding) => holding.is_some(),
            (_, None) => false,
            (Method::AsaAmountEq, Some(balance)) => balance == amount,
            (Method::AsaAmountGt, Some(balance)) => balance > amount,
            (Method::AsaAmountGe, Some(balance)) => balance >= amount,
            (Method::AsaAmountLt, Some(balance)) => balance < amount,
            (Method::AsaAmountLe, Some(balance)) => balance <= amount,
        }
    }
}

/// Application definition deployed by the harness.
#[derive(Debug, Clone, Copy)]
pub struct Contract {
    pub approval_source: &'static str,
    pub clear_source: &'static str,
    pub global_schema: StateSchema,
    pub local_schema: StateSchema,
}

impl Contract {
    pub const fn asa_state_observer() -> Self {
        Self {
            approval_source: APPROVAL_PROGRAM,
            clear_source: CLEAR_PROGRAM,
            global_schema: GLOBAL_SCHEMA,
            local_schema: LOCAL_SCHEMA,
        }
    }
}

pub fn call_args(method: Method, amount: Option<u64>) -> Vec<Vec<u8>> {
    let mut args = vec![method.as_ref().as_bytes().to_vec()];
    if let Some(amount) = amount {
        args.push(amount.to_be_bytes().to_vec());
    }
    args
}

// NoOp call asking whether `target` holds `asset_id` as described by `method`
pub fn observer_call(
    app_id: u64,
    method: Method,
    amount: Option<u64>,
    target: Address,
    asset_id: u64,
) -> ApplicationCall {
    ApplicationCall::no_op(app_id, call_args(method, amount))
        .with_accounts(vec![target])
        .with_foreign_assets(vec![asset_id])
}
