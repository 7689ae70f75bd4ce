use serde::de::Error as SerdeError;
use serde::{Deserialize, Serialize};
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};
use strum::{AsRefStr, Display as StrumDisplay, EnumString};

use crate::{
    config::TX_PREFIX,
    crypto::{base32, hash_with_prefix, Address, CryptoError, Hash},
    serializer::{MapBuilder, Serializer, Value},
};

pub mod builder;

mod payload;
mod signed;

pub use payload::*;
pub use signed::*;

// Ledger transaction kinds handled by the harness, named by their wire tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, StrumDisplay, EnumString)]
pub enum TransactionType {
    #[strum(serialize = "pay")]
    Payment,
    #[strum(serialize = "acfg")]
    AssetConfig,
    #[strum(serialize = "appl")]
    ApplicationCall,
}

/// Transaction identifier: SHA-512/256 of the prefixed canonical encoding,
/// displayed as unpadded base32.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxId(Hash);

impl TxId {
    pub fn new(hash: Hash) -> Self {
        Self(hash)
    }

    pub fn as_hash(&self) -> &Hash {
        &self.0
    }
}

impl Display for TxId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", base32::encode(self.0.as_bytes()))
    }
}

impl fmt::Debug for TxId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "TxId({})", self)
    }
}

impl FromStr for TxId {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = base32::decode(s)?;
        Ok(Self(Hash::from_slice(&bytes)?))
    }
}

impl Serialize for TxId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TxId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(SerdeError::custom)
    }
}

/// Fields shared by every transaction kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub sender: Address,
    pub fee: u64,
    pub first_valid: u64,
    pub last_valid: u64,
    pub genesis_id: String,
    pub genesis_hash: Hash,
    pub note: Vec<u8>,
}

// this enum represent all types of transaction built by the harness
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionPayload {
    Payment(Payment),
    AssetConfig(AssetConfig),
    ApplicationCall(ApplicationCall),
}

impl TransactionPayload {
    pub fn get_type(&self) -> TransactionType {
        match self {
            Self::Payment(_) => TransactionType::Payment,
            Self::AssetConfig(_) => TransactionType::AssetConfig,
            Self::ApplicationCall(_) => TransactionType::ApplicationCall,
        }
    }
}

/// An unsigned transaction. Immutable once wrapped in a
/// [`SignedTransaction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    header: Header,
    payload: TransactionPayload,
}

impl Transaction {
    pub fn new(header: Header, payload: TransactionPayload) -> Self {
        Self { header, payload }
    }

    pub fn get_header(&self) -> &Header {
        &self.header
    }

    pub fn get_sender(&self) -> &Address {
        &self.header.sender
    }

    pub fn get_payload(&self) -> &TransactionPayload {
        &self.payload
    }

    pub fn get_type(&self) -> TransactionType {
        self.payload.get_type()
    }

    // Bytes covered by the signature
    pub fn bytes_to_sign(&self) -> Vec<u8> {
        let mut bytes = TX_PREFIX.to_vec();
        bytes.extend_from_slice(&self.to_bytes());
        bytes
    }

    pub fn id(&self) -> TxId {
        TxId(hash_with_prefix(TX_PREFIX, &self.to_bytes()))
    }
}

impl Serializer for Transaction {
    fn to_value(&self) -> Value {
        let header = &self.header;
        let builder = MapBuilder::new()
            .uint("fee", header.fee)
            .uint("fv", header.first_valid)
            .str("gen", &header.genesis_id)
            .bytes("gh", header.genesis_hash.as_bytes())
            .uint("lv", header.last_valid)
            .bytes("note", &header.note)
            .bytes("snd", header.sender.as_bytes())
            .str("type", self.get_type().as_ref());

        match &self.payload {
            TransactionPayload::Payment(payment) => payment.write_fields(builder),
            TransactionPayload::AssetConfig(config) => config.write_fields(builder),
            TransactionPayload::ApplicationCall(call) => call.write_fields(builder),
        }
        .build()
    }
}

#[cfg(test)]
mod tests;
