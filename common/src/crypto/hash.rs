use serde::de::Error as SerdeError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512_256};
use std::{
    convert::TryInto,
    fmt::{Display, Error, Formatter},
    str::FromStr,
};

use super::CryptoError;

pub const HASH_SIZE: usize = 32; // 32 bytes / 256 bits

#[derive(Eq, PartialEq, PartialOrd, Ord, Clone, Copy, Debug, Hash)]
pub struct Hash([u8; HASH_SIZE]);

impl Hash {
    pub const fn new(bytes: [u8; HASH_SIZE]) -> Self {
        Hash(bytes)
    }

    pub const fn zero() -> Self {
        Hash::new([0; HASH_SIZE])
    }

    pub fn from_slice(slice: &[u8]) -> Result<Self, CryptoError> {
        let bytes: [u8; HASH_SIZE] =
            slice
                .try_into()
                .map_err(|_| CryptoError::InvalidHashLength {
                    len: slice.len(),
                    expected: HASH_SIZE,
                })?;
        Ok(Hash(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    pub fn to_bytes(self) -> [u8; HASH_SIZE] {
        self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn to_base64(&self) -> String {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.encode(self.0)
    }

    pub fn from_base64(value: &str) -> Result<Self, CryptoError> {
        use base64::Engine;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(value)
            .map_err(|e| CryptoError::InvalidBase64(e.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl FromStr for Hash {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| CryptoError::DecodeError(e.to_string()))?;
        Self::from_slice(&bytes)
    }
}

// Hash a byte array using SHA-512/256
#[inline(always)]
pub fn hash(value: &[u8]) -> Hash {
    let result: [u8; HASH_SIZE] = Sha512_256::digest(value).into();
    Hash(result)
}

// Hash a prefixed message without concatenating first
pub fn hash_with_prefix(prefix: &[u8], value: &[u8]) -> Hash {
    let mut hasher = Sha512_256::new();
    hasher.update(prefix);
    hasher.update(value);
    Hash(hasher.finalize().into())
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Display for Hash {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", &self.to_hex())
    }
}

// Ledger REST APIs exchange hashes as base64
impl Serialize for Hash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'a> Deserialize<'a> for Hash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'a>,
    {
        let value = String::deserialize(deserializer)?;
        Hash::from_base64(&value).map_err(SerdeError::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha512_256_known_vector() {
        // FIPS 180-4 example for "abc"
        assert_eq!(
            hash(b"abc").to_hex(),
            "53048e2681941ef99b2e29b76b4c7dabe4c2d0c634fc6d46e0e2f13107e7af23"
        );
    }

    #[test]
    fn test_prefixed_hash_matches_concatenation() {
        assert_eq!(hash_with_prefix(b"TX", b"body"), hash(b"TXbody"));
    }

    #[test]
    fn test_base64_roundtrip() {
        let value = hash(b"genesis");
        let encoded = value.to_base64();
        assert_eq!(Hash::from_base64(&encoded).unwrap(), value);
    }

    #[test]
    fn test_invalid_length() {
        assert_eq!(
            Hash::from_slice(&[0u8; 31]),
            Err(CryptoError::InvalidHashLength {
                len: 31,
                expected: HASH_SIZE
            })
        );
    }
}
