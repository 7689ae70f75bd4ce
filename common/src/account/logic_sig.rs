use crate::{
    config::PROGRAM_PREFIX,
    crypto::{Address, CryptoError, KeyPair, Signature},
    serializer::{MapBuilder, Value},
};

// Key holder's consent for a program to sign on its behalf
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delegation {
    pub delegator: Address,
    pub signature: Signature,
}

/// Program-authorized signature.
///
/// Without a delegation the program controls its own escrow address.
/// With one, it approves transactions of the delegating account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicSig {
    program: Vec<u8>,
    args: Vec<Vec<u8>>,
    delegation: Option<Delegation>,
}

impl LogicSig {
    pub fn new(program: Vec<u8>, args: Vec<Vec<u8>>) -> Self {
        Self {
            program,
            args,
            delegation: None,
        }
    }

    // Bytes the delegator signs
    pub fn program_message(program: &[u8]) -> Vec<u8> {
        let mut message = PROGRAM_PREFIX.to_vec();
        message.extend_from_slice(program);
        message
    }

    pub fn delegate(mut self, keypair: &KeyPair) -> Self {
        let signature = keypair.sign(&Self::program_message(&self.program));
        self.delegation = Some(Delegation {
            delegator: keypair.address(),
            signature,
        });
        self
    }

    pub fn get_program(&self) -> &[u8] {
        &self.program
    }

    pub fn get_args(&self) -> &[Vec<u8>] {
        &self.args
    }

    pub fn get_delegation(&self) -> Option<&Delegation> {
        self.delegation.as_ref()
    }

    pub fn address(&self) -> Address {
        match &self.delegation {
            Some(delegation) => delegation.delegator,
            None => Address::for_program(&self.program),
        }
    }

    pub fn verify_delegation(&self) -> Result<(), CryptoError> {
        match &self.delegation {
            Some(delegation) => delegation.delegator.to_public_key().verify(
                &Self::program_message(&self.program),
                &delegation.signature,
            ),
            None => Ok(()),
        }
    }

    pub fn to_value(&self) -> Value {
        MapBuilder::new()
            .value(
                "arg",
                Value::Array(self.args.iter().cloned().map(Value::Bytes).collect()),
            )
            .bytes("l", &self.program)
            .opt_bytes(
                "sig",
                self.delegation.as_ref().map(|d| &d.signature.as_bytes()[..]),
            )
            .build()
    }
}
