use serde::de::Error as SerdeError;
use serde::{Deserialize, Serialize};
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use super::{base32, hash, hash_with_prefix, CryptoError, PublicKey, PUBLIC_KEY_SIZE};
use crate::config::PROGRAM_PREFIX;

pub const CHECKSUM_SIZE: usize = 4;
// base32 of 32 bytes key + 4 bytes checksum
pub const ADDRESS_STRING_LENGTH: usize = 58;

/// A ledger account address: the 32 bytes of an ed25519 public key, or the
/// hash of a program for logic sig escrow accounts.
///
/// Rendered as base32 of the bytes followed by the last four bytes of their
/// SHA-512/256 digest.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; PUBLIC_KEY_SIZE]);

impl Address {
    pub const fn new(bytes: [u8; PUBLIC_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub const fn zero() -> Self {
        Self([0; PUBLIC_KEY_SIZE])
    }

    pub fn from_slice(slice: &[u8]) -> Result<Self, CryptoError> {
        if slice.len() != PUBLIC_KEY_SIZE {
            return Err(CryptoError::InvalidKeyLength {
                len: slice.len(),
                expected: PUBLIC_KEY_SIZE,
            });
        }
        let mut bytes = [0u8; PUBLIC_KEY_SIZE];
        bytes.copy_from_slice(slice);
        Ok(Self(bytes))
    }

    // Escrow address controlled by a program
    pub fn for_program(program: &[u8]) -> Self {
        Self(hash_with_prefix(PROGRAM_PREFIX, program).to_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0; PUBLIC_KEY_SIZE]
    }

    pub fn to_public_key(&self) -> PublicKey {
        PublicKey::from_bytes(self.0)
    }

    fn checksum(&self) -> [u8; CHECKSUM_SIZE] {
        let digest = hash(&self.0);
        let mut checksum = [0u8; CHECKSUM_SIZE];
        checksum.copy_from_slice(&digest.as_bytes()[PUBLIC_KEY_SIZE - CHECKSUM_SIZE..]);
        checksum
    }
}

impl From<PublicKey> for Address {
    fn from(key: PublicKey) -> Self {
        Self(*key.as_bytes())
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut bytes = Vec::with_capacity(PUBLIC_KEY_SIZE + CHECKSUM_SIZE);
        bytes.extend_from_slice(&self.0);
        bytes.extend_from_slice(&self.checksum());
        write!(f, "{}", base32::encode(&bytes))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != ADDRESS_STRING_LENGTH {
            return Err(CryptoError::InvalidAddress(s.to_owned()));
        }

        let decoded = base32::decode(s)?;
        if decoded.len() != PUBLIC_KEY_SIZE + CHECKSUM_SIZE {
            return Err(CryptoError::InvalidAddress(s.to_owned()));
        }

        let address = Self::from_slice(&decoded[..PUBLIC_KEY_SIZE])?;
        if address.checksum() != decoded[PUBLIC_KEY_SIZE..] {
            return Err(CryptoError::InvalidChecksum);
        }

        Ok(address)
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(SerdeError::custom)
    }
}
