//! Reed–Solomon RS(255,223) forward error correction.
//!
//! This module provides:
//! - [`encode`] — shift an arbitrary payload into RS(255,223) codewords
//! - [`decode`] — recover the original payload, correcting up to 16
//!   byte errors per 255-byte codeword
//! - [`EncodedData`] — the encoded payload plus the metadata needed to
//!   decode it back
//!
//! # Block geometry
//!
//! Each codeword is [`RS_BLOCK_SIZE`] = 255 bytes: [`RS_DATA_SIZE`] = 223
//! bytes of data followed by [`RS_PARITY_SIZE`] = 32 bytes of parity.
//! The codec is built on the `reed-solomon` crate's classical
//! Berlekamp–Massey/Forney decoder (fixed 255-byte codeword, CCSDS-style
//! primitive polynomial), not an erasure-coding crate — erasure coders
//! only recover from *known-missing* shards, not silent corruption at
//! unknown byte offsets, which is exactly what this module must survive.
//!
//! `redundancy_percent` is a user-facing knob (5..=50) recorded in
//! [`EncodedData`] metadata; the physical encoding always appends the
//! fixed 32 parity bytes per 223-byte block regardless of the requested
//! percentage (see [`encode`] step 3).

use crate::error::RsError;
use reed_solomon::{Decoder, Encoder};

/// Data bytes per RS codeword.
pub const RS_DATA_SIZE: usize = 223;

/// Parity bytes per RS codeword.
pub const RS_PARITY_SIZE: usize = 32;

/// Total codeword length: [`RS_DATA_SIZE`] + [`RS_PARITY_SIZE`].
pub const RS_BLOCK_SIZE: usize = RS_DATA_SIZE + RS_PARITY_SIZE;

/// Minimum accepted redundancy percentage.
pub const MIN_REDUNDANCY_PERCENT: u8 = 5;

/// Maximum accepted redundancy percentage.
pub const MAX_REDUNDANCY_PERCENT: u8 = 50;

/// An RS(255,223)-encoded payload plus the metadata needed to decode it.
#[derive(Debug, Clone)]
pub struct EncodedData {
    /// Encoded payload: `num_data_blocks` codewords of [`RS_BLOCK_SIZE`]
    /// bytes each, data and parity interleaved by block.
    pub data: Vec<u8>,
    /// Original, unpadded input length in bytes.
    pub original_size: u32,
    /// User-facing redundancy percentage this encoding was requested at.
    pub redundancy_percent: u8,
    /// Codeword size — always [`RS_BLOCK_SIZE`].
    pub block_size: usize,
    /// Number of 223-byte data blocks the input was split into.
    pub num_data_blocks: usize,
    /// Informational parity-block count derived from `redundancy_percent`.
    ///
    /// Not used during decode — the physical encoding always carries one
    /// 32-byte parity section per data block regardless of this count.
    pub num_parity_blocks: usize,
}

/// Encode `data` into RS(255,223) codewords at the given redundancy
/// percentage.
///
/// # Errors
///
/// Returns [`RsError::InvalidRedundancy`] if `redundancy_percent` is
/// outside `5..=50`. Returns [`RsError::InvalidData`] if `data` is
/// empty. Returns [`RsError::EncodingFailed`] if the underlying encoder
/// rejects a block. Returns [`RsError::BlockSizeTooLarge`] if the
/// adapter hands back a codeword whose length doesn't match
/// [`RS_BLOCK_SIZE`].
pub fn encode(data: &[u8], redundancy_percent: u8) -> Result<EncodedData, RsError> {
    if !(MIN_REDUNDANCY_PERCENT..=MAX_REDUNDANCY_PERCENT).contains(&redundancy_percent) {
        return Err(RsError::InvalidRedundancy(redundancy_percent));
    }
    if data.is_empty() {
        return Err(RsError::InvalidData("input data must not be empty".into()));
    }

    let original_size = u32::try_from(data.len())
        .map_err(|_| RsError::InvalidData("input exceeds u32::MAX bytes".into()))?;

    let padded_len = padded_length(data.len());
    let num_data_blocks = padded_len.div_ceil(RS_DATA_SIZE);

    let num_parity_blocks = {
        let numerator = num_data_blocks
            .checked_mul(usize::from(redundancy_percent))
            .ok_or_else(|| RsError::EncodingFailed("parity block count overflow".into()))?;
        numerator.div_ceil(100)
    };

    let mut padded = Vec::with_capacity(padded_len);
    padded.extend_from_slice(data);
    padded.resize(padded_len, 0u8);

    let encoder = Encoder::new(RS_PARITY_SIZE);
    let mut out = Vec::with_capacity(num_data_blocks.saturating_mul(RS_BLOCK_SIZE));

    for chunk in padded.chunks_exact(RS_DATA_SIZE) {
        let block: [u8; RS_DATA_SIZE] = chunk
            .try_into()
            .map_err(|_| RsError::EncodingFailed("data block has the wrong length".into()))?;
        let codeword = encoder.encode(&block);
        if codeword.len() != RS_BLOCK_SIZE {
            return Err(RsError::BlockSizeTooLarge(codeword.len(), RS_BLOCK_SIZE));
        }
        out.extend_from_slice(&codeword);
    }

    Ok(EncodedData {
        data: out,
        original_size,
        redundancy_percent,
        block_size: RS_BLOCK_SIZE,
        num_data_blocks,
        num_parity_blocks,
    })
}

/// Decode RS(255,223) codewords back into the original payload.
///
/// All-or-nothing: if any codeword fails to correct, the whole decode
/// fails — this matches the authenticated-encryption context the header
/// payload feeds into, where a partially-recovered header is as useless
/// as a fully corrupted one.
///
/// # Errors
///
/// Returns [`RsError::InvalidData`] if `data` is empty, not a multiple
/// of [`RS_BLOCK_SIZE`], or `original_size` is zero. Returns
/// [`RsError::DecodingFailed`] if any codeword cannot be corrected.
/// Returns [`RsError::LibcorrectError`] if the adapter reports a
/// successful correction but returns a recovered block of the wrong
/// length — an internal invariant violation distinct from an
/// uncorrectable codeword.
pub fn decode(data: &[u8], original_size: u32) -> Result<Vec<u8>, RsError> {
    if data.is_empty() {
        return Err(RsError::InvalidData("encoded data must not be empty".into()));
    }
    if original_size == 0 {
        return Err(RsError::InvalidData("original_size must not be zero".into()));
    }
    if !data.len().is_multiple_of(RS_BLOCK_SIZE) {
        return Err(RsError::InvalidData(format!(
            "encoded data length {} is not a multiple of block size {RS_BLOCK_SIZE}",
            data.len()
        )));
    }

    let decoder = Decoder::new(RS_PARITY_SIZE);
    let num_data_blocks = data.len().div_ceil(RS_BLOCK_SIZE);
    let mut recovered = Vec::with_capacity(num_data_blocks.saturating_mul(RS_DATA_SIZE));

    for (block_index, codeword) in data.chunks_exact(RS_BLOCK_SIZE).enumerate() {
        let corrected = decoder
            .correct(codeword, None)
            .map_err(|e| RsError::DecodingFailed(format!("block {block_index}: {e:?}")))?;

        // The adapter reported a successful correction but handed back a
        // data section of the wrong length — an adapter-level invariant
        // violation distinct from the "too many errors to correct" case
        // above, which is already covered by `DecodingFailed`.
        let block_data = corrected.data();
        if block_data.len() != RS_DATA_SIZE {
            return Err(RsError::LibcorrectError(format!(
                "block {block_index}: adapter returned {} recovered bytes, expected {RS_DATA_SIZE}",
                block_data.len()
            )));
        }
        recovered.extend_from_slice(block_data);
    }

    let original_size = original_size as usize;
    if original_size > recovered.len() {
        return Err(RsError::DecodingFailed(format!(
            "original_size {original_size} exceeds recovered length {}",
            recovered.len()
        )));
    }
    recovered.truncate(original_size);
    Ok(recovered)
}

/// The size `data.len()` would pad up to — the next multiple of
/// [`RS_DATA_SIZE`].
fn padded_length(len: usize) -> usize {
    len.div_ceil(RS_DATA_SIZE).saturating_mul(RS_DATA_SIZE)
}

/// Calculate the encoded size (in bytes) for a payload of `data_len`
/// bytes, without performing the encode.
///
/// Informational helper mirroring the metadata `encode` records;
/// callers can use this to pre-size buffers.
#[must_use]
pub fn calculate_encoded_size(data_len: usize) -> usize {
    if data_len == 0 {
        return 0;
    }
    data_len.div_ceil(RS_DATA_SIZE).saturating_mul(RS_BLOCK_SIZE)
}
