use thiserror::Error;

/// Errors that can occur during cryptographic operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Invalid base32 character or trailing bits
    #[error("Invalid base32 string: {0}")]
    InvalidBase32(String),

    /// Invalid base64 string
    #[error("Invalid base64 string: {0}")]
    InvalidBase64(String),

    /// Hash has invalid length
    #[error("Invalid hash length: {len} bytes, expected: {expected} bytes")]
    InvalidHashLength { len: usize, expected: usize },

    /// Invalid checksum in address
    #[error("Invalid checksum")]
    InvalidChecksum,

    /// Address string is malformed or invalid
    #[error("Invalid address format: {0}")]
    InvalidAddress(String),

    /// Key material has the wrong size
    #[error("Invalid key length: {len} bytes, expected: {expected} bytes")]
    InvalidKeyLength { len: usize, expected: usize },

    /// Exported key does not match the address it was exported for
    #[error("Exported key does not belong to address {0}")]
    KeyMismatch(String),

    /// Signature verification failed
    #[error("Signature verification failed")]
    VerificationFailed,

    /// Hex decode error
    #[error("Failed to decode hex: {0}")]
    DecodeError(String),
}
