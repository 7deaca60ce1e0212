//! Error types for `vaultcore`.

use thiserror::Error;

/// Errors produced by the Reed–Solomon codec.
///
/// Wrapped by [`VaultCoreError::FecEncodingFailed`] /
/// [`VaultCoreError::FecDecodingFailed`] at the vault-format boundary.
#[derive(Debug, Error)]
pub enum RsError {
    /// Redundancy percentage outside `5..=50`.
    #[error("invalid redundancy percentage: {0} (expected 5..=50)")]
    InvalidRedundancy(u8),

    /// Input data was empty or `original_size` was zero.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// The adapter returned a codeword whose length didn't match the
    /// fixed codeword size this module requires.
    #[error("block size too large: {0} (maximum {1})")]
    BlockSizeTooLarge(usize, usize),

    /// The underlying encoder rejected the payload.
    #[error("encoding failed: {0}")]
    EncodingFailed(String),

    /// One or more codewords could not be corrected.
    #[error("decoding failed: {0}")]
    DecodingFailed(String),

    /// The `reed-solomon` adapter returned an error outside the above
    /// categories (construction failure, internal invariant violation).
    #[error("libcorrect adapter error: {0}")]
    LibcorrectError(String),
}

/// Errors surfaced by every public operation in `vaultcore`.
#[derive(Debug, Error)]
pub enum VaultCoreError {
    /// Magic bytes, structural bounds, or consistency checks failed.
    #[error("corrupted file: {0}")]
    CorruptedFile(String),

    /// File version is not one this crate can read.
    #[error("unsupported version: {0}")]
    UnsupportedVersion(u32),

    /// Input bytes failed a basic validity check before any parsing began.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Header FEC encoding failed while writing.
    #[error("header FEC encoding failed: {0}")]
    FecEncodingFailed(#[source] RsError),

    /// Header FEC decoding failed while reading.
    #[error("header FEC decoding failed: {0}")]
    FecDecodingFailed(#[source] RsError),

    /// The collaborator's vault-header serializer rejected the header.
    #[error("serialization failed: {0}")]
    SerializationFailed(String),

    /// The collaborator's vault-header deserializer rejected the bytes.
    #[error("deserialization failed: {0}")]
    DeserializationFailed(String),

    /// A cryptographic primitive (hashing, CSPRNG) failed.
    #[error("crypto error: {0}")]
    CryptoError(String),

    /// Key derivation failed (delegated KDF collaborator).
    #[error("key derivation failed: {0}")]
    KeyDerivationFailed(String),

    /// The password matched the common-password blacklist or reuse history.
    ///
    /// Not emitted by the core directly — surfaced by the policy layer
    /// that calls [`crate::common_password::is_common_password`] /
    /// [`crate::password_history::is_password_reused`].
    #[error("weak password rejected by policy")]
    WeakPassword,
}
