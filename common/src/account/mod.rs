//! Accounts and the ways they can authorize a transaction.

mod logic_sig;

pub use logic_sig::{Delegation, LogicSig};

use thiserror::Error;

use crate::{
    crypto::{Address, CryptoError, KeyPair},
    transaction::{Authorization, SignedTransaction, Transaction},
};

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Account {0} has no signer")]
    MissingSigner(Address),
    #[error("Signer of {signer} cannot authorize transactions from {sender}")]
    ForeignSender { signer: Address, sender: Address },
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// Authority able to approve transactions for an address.
/// A key and a logic sig are mutually exclusive.
#[derive(Debug, Clone)]
pub enum Signer {
    Key(KeyPair),
    LogicSig(LogicSig),
}

impl Signer {
    // Address whose transactions this signer authorizes
    pub fn address(&self) -> Address {
        match self {
            Signer::Key(keypair) => keypair.address(),
            Signer::LogicSig(logic_sig) => logic_sig.address(),
        }
    }

    pub fn sign(&self, transaction: Transaction) -> SignedTransaction {
        let authorizer = self.address();
        let authorization = match self {
            Signer::Key(keypair) => {
                Authorization::Signature(keypair.sign(&transaction.bytes_to_sign()))
            }
            Signer::LogicSig(logic_sig) => Authorization::LogicSig(logic_sig.clone()),
        };
        SignedTransaction::new(transaction, authorization, authorizer)
    }
}

/// A ledger account: an address plus, optionally, the means to sign for it.
/// Accounts without a signer can only be referenced, never send.
#[derive(Debug, Clone)]
pub struct Account {
    address: Address,
    signer: Option<Signer>,
}

impl Account {
    // Fresh keypair, never touches the network
    pub fn generate() -> Self {
        Self::from_keypair(KeyPair::generate())
    }

    pub fn from_keypair(keypair: KeyPair) -> Self {
        Self {
            address: keypair.address(),
            signer: Some(Signer::Key(keypair)),
        }
    }

    pub fn from_logic_sig(logic_sig: LogicSig) -> Self {
        Self {
            address: logic_sig.address(),
            signer: Some(Signer::LogicSig(logic_sig)),
        }
    }

    pub fn watch(address: Address) -> Self {
        Self {
            address,
            signer: None,
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn signer(&self) -> Option<&Signer> {
        self.signer.as_ref()
    }

    pub fn can_sign(&self) -> bool {
        self.signer.is_some()
    }

    pub fn sign(&self, transaction: Transaction) -> Result<SignedTransaction, AccountError> {
        let signer = self
            .signer
            .as_ref()
            .ok_or(AccountError::MissingSigner(self.address))?;

        if *transaction.get_sender() != self.address {
            return Err(AccountError::ForeignSender {
                signer: self.address,
                sender: *transaction.get_sender(),
            });
        }

        Ok(signer.sign(transaction))
    }
}
