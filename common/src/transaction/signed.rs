use crate::{
    account::LogicSig,
    crypto::{Address, Signature},
    serializer::{MapBuilder, Serializer, Value},
};

use super::{Transaction, TxId};

// How a signed transaction proves the sender's consent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    Signature(Signature),
    LogicSig(LogicSig),
}

/// A transaction together with its authorization. Nothing in it can change
/// after signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    transaction: Transaction,
    authorization: Authorization,
    // Set when the authorizer is not the sender itself
    auth_address: Option<Address>,
}

impl SignedTransaction {
    pub fn new(
        transaction: Transaction,
        authorization: Authorization,
        authorizer: Address,
    ) -> Self {
        let auth_address = if authorizer == *transaction.get_sender() {
            None
        } else {
            Some(authorizer)
        };

        Self {
            transaction,
            authorization,
            auth_address,
        }
    }

    pub fn get_transaction(&self) -> &Transaction {
        &self.transaction
    }

    pub fn get_authorization(&self) -> &Authorization {
        &self.authorization
    }

    pub fn get_auth_address(&self) -> Option<&Address> {
        self.auth_address.as_ref()
    }

    pub fn id(&self) -> TxId {
        self.transaction.id()
    }
}

impl Serializer for SignedTransaction {
    fn to_value(&self) -> Value {
        let builder = match &self.authorization {
            Authorization::Signature(signature) => {
                MapBuilder::new().bytes("sig", signature.as_bytes())
            }
            Authorization::LogicSig(logic_sig) => {
                MapBuilder::new().value("lsig", logic_sig.to_value())
            }
        };

        builder
            .opt_bytes(
                "sgnr",
                self.auth_address.as_ref().map(|a| &a.as_bytes()[..]),
            )
            .value("txn", self.transaction.to_value())
            .build()
    }
}
