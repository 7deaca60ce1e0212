//! Vault container file format V2 — preamble, header FEC wrapping, version
//! detection.
//!
//! This module provides:
//! - [`detect_version`] — read the version field without validating anything else
//! - [`is_valid_v2_vault`] — convenience wrapper over `detect_version`
//! - [`write_header`] — emit the V2 preamble, optionally FEC-protecting the header
//! - [`read_header`] — parse the V2 preamble, recovering the header through FEC if present
//!
//! # File preamble layout (little-endian, contiguous)
//!
//! ```text
//! offset  size  field
//! 0       4     magic
//! 4       4     version (= 2)
//! 8       4     pbkdf2_iterations
//! 12      4     header_size          (= 1 + len(header_data_section))
//! 16      1     header_flags
//! 17      H     header_data_section  (H = header_size - 1)
//! 17+H    32    data_salt
//! 49+H    12    data_iv
//! 61+H    …     encrypted body (caller's domain)
//! ```
//!
//! When `header_flags & HEADER_FLAG_FEC_ENABLED`, `header_data_section`
//! holds `[stored_redundancy:1][original_size:4 big-endian][encoded_bytes:…]`.
//! The big-endian `original_size` inside the FEC wrapper is intentional and
//! asymmetric with the little-endian preamble — preserved for
//! cross-implementation compatibility.
//!
//! This module never deserializes the vault-header payload — it is an
//! opaque byte blob owned by the caller's own encoder/decoder. The only
//! transformation this module applies to it is the optional RS wrap/unwrap.

use crate::error::VaultCoreError;
use crate::rs_codec;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic bytes identifying a vault container file.
pub const VAULT_MAGIC: [u8; 4] = *b"VCV2";

/// The only version this module can fully parse.
pub const VAULT_VERSION_V2: u32 = 2;

/// Upper bound on a well-formed header payload. Values above this are
/// treated as corruption regardless of whether the file itself is larger.
pub const MAX_HEADER_SIZE: usize = 1_048_576;

/// `header_flags` bit indicating the header payload is RS-FEC wrapped.
pub const HEADER_FLAG_FEC_ENABLED: u8 = 0x01;

/// Floor on the *effective* encoding redundancy, independent of the
/// caller-stated `user_redundancy` preference.
pub const MIN_HEADER_FEC_REDUNDANCY: u8 = 20;

/// Length of `data_salt`.
const DATA_SALT_LEN: usize = 32;

/// Length of `data_iv`.
const DATA_IV_LEN: usize = 12;

/// `data_salt` + `data_iv` combined length, used repeatedly in bounds checks.
const SALT_AND_IV_LEN: usize = DATA_SALT_LEN + DATA_IV_LEN;

/// Byte length of the four little-endian preamble fields before
/// `header_flags` (magic, version, `pbkdf2_iterations`, `header_size`).
const FIXED_PREAMBLE_LEN: usize = 16;

/// Offset of `header_flags`, and the point at which `header_data_section`
/// begins (`FIXED_PREAMBLE_LEN + 1`).
const HEADER_DATA_OFFSET: usize = FIXED_PREAMBLE_LEN + 1;

/// Length of the FEC wrapper's fixed prefix: `stored_redundancy` (1 byte)
/// + `original_size` (4 bytes, big-endian).
const FEC_WRAPPER_PREFIX_LEN: usize = 5;

/// Minimum byte length `detect_version` needs to read the version field.
const MIN_VERSION_DETECTION_LEN: usize = 8;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A parsed V2 vault container header.
#[derive(Clone, Debug)]
pub struct V2FileHeader {
    /// Always [`VAULT_MAGIC`] for a successfully parsed header.
    pub magic: [u8; 4],
    /// Always [`VAULT_VERSION_V2`] for a successfully parsed header.
    pub version: u32,
    /// KDF work factor, carried verbatim for the KEK layer.
    pub pbkdf2_iterations: u32,
    /// `1 + len(header_data_section)`, as stored on disk.
    pub header_size: u32,
    /// Raw `header_flags` byte.
    pub header_flags: u8,
    /// Recovered (and, if FEC was enabled, decoded) vault-header bytes.
    /// Opaque to this module — never deserialized here.
    pub vault_header: Vec<u8>,
    /// Data-encryption salt.
    pub data_salt: [u8; DATA_SALT_LEN],
    /// Data-encryption IV.
    pub data_iv: [u8; DATA_IV_LEN],
    /// The *stored* (user-preference) redundancy percentage. Zero when
    /// FEC was disabled on read.
    pub fec_redundancy_percent: u8,
}

// ---------------------------------------------------------------------------
// Version detection
// ---------------------------------------------------------------------------

/// Read the version field without validating the rest of the file.
///
/// # Errors
///
/// Returns [`VaultCoreError::CorruptedFile`] if `bytes` is shorter than
/// [`MIN_VERSION_DETECTION_LEN`] or the magic bytes don't match. Returns
/// [`VaultCoreError::UnsupportedVersion`] if the version field is neither
/// 1 nor 2 — version 1 is recognized here for routing purposes only;
/// [`read_header`] cannot parse it.
pub fn detect_version(bytes: &[u8]) -> Result<u32, VaultCoreError> {
    if bytes.len() < MIN_VERSION_DETECTION_LEN {
        return Err(VaultCoreError::CorruptedFile(format!(
            "file too short to detect version: {} bytes (minimum {MIN_VERSION_DETECTION_LEN})",
            bytes.len()
        )));
    }
    if bytes[..4] != VAULT_MAGIC {
        return Err(VaultCoreError::CorruptedFile("invalid magic bytes".into()));
    }

    let version = u32::from_le_bytes(
        bytes[4..8]
            .try_into()
            .expect("slice of length 4 converts to [u8; 4]"),
    );

    match version {
        1 | 2 => Ok(version),
        other => Err(VaultCoreError::UnsupportedVersion(other)),
    }
}

/// Convenience wrapper: `true` iff `detect_version` reports
/// [`VAULT_VERSION_V2`].
#[must_use]
pub fn is_valid_v2_vault(bytes: &[u8]) -> bool {
    matches!(detect_version(bytes), Ok(v) if v == VAULT_VERSION_V2)
}

// ---------------------------------------------------------------------------
// Write
// ---------------------------------------------------------------------------

/// Emit the V2 preamble, optionally RS-FEC wrapping `vault_header`.
///
/// The caller appends the encrypted body after the returned bytes.
///
/// # Errors
///
/// Returns [`VaultCoreError::SerializationFailed`] if `vault_header` is
/// empty. Returns [`VaultCoreError::FecEncodingFailed`] if `enable_fec` is
/// set and the RS codec rejects the payload. Returns
/// [`VaultCoreError::InvalidData`] if the resulting sizes overflow a u32.
pub fn write_header(
    vault_header: &[u8],
    pbkdf2_iterations: u32,
    data_salt: [u8; DATA_SALT_LEN],
    data_iv: [u8; DATA_IV_LEN],
    enable_fec: bool,
    user_redundancy: u8,
) -> Result<Vec<u8>, VaultCoreError> {
    if vault_header.is_empty() {
        return Err(VaultCoreError::SerializationFailed(
            "vault header payload must not be empty".into(),
        ));
    }

    let (header_data_section, header_flags) = if enable_fec {
        let effective = user_redundancy.max(MIN_HEADER_FEC_REDUNDANCY);
        let encoded = rs_codec::encode(vault_header, effective)
            .map_err(VaultCoreError::FecEncodingFailed)?;

        let mut section =
            Vec::with_capacity(FEC_WRAPPER_PREFIX_LEN.saturating_add(encoded.data.len()));
        section.push(user_redundancy);
        section.extend_from_slice(&encoded.original_size.to_be_bytes());
        section.extend_from_slice(&encoded.data);
        (section, HEADER_FLAG_FEC_ENABLED)
    } else {
        (vault_header.to_vec(), 0u8)
    };

    let header_size = u32::try_from(1usize.saturating_add(header_data_section.len()))
        .map_err(|_| VaultCoreError::InvalidData("header size exceeds u32::MAX".into()))?;

    let out_capacity = FIXED_PREAMBLE_LEN
        .saturating_add(1)
        .saturating_add(header_data_section.len())
        .saturating_add(SALT_AND_IV_LEN);
    let mut out = Vec::with_capacity(out_capacity);
    out.extend_from_slice(&VAULT_MAGIC);
    out.extend_from_slice(&VAULT_VERSION_V2.to_le_bytes());
    out.extend_from_slice(&pbkdf2_iterations.to_le_bytes());
    out.extend_from_slice(&header_size.to_le_bytes());
    out.push(header_flags);
    out.extend_from_slice(&header_data_section);
    out.extend_from_slice(&data_salt);
    out.extend_from_slice(&data_iv);

    Ok(out)
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

/// Parse the V2 preamble, recovering the vault-header bytes (through FEC
/// decoding if the file has it enabled).
///
/// Returns the parsed header and the byte offset at which the encrypted
/// body begins.
///
/// # Errors
///
/// Returns [`VaultCoreError::CorruptedFile`] for a too-short input, wrong
/// magic, out-of-range `header_size`, or a truncated FEC wrapper. Returns
/// [`VaultCoreError::UnsupportedVersion`] if the version field is not 2
/// (including a recognized-but-unreadable version 1). Returns
/// [`VaultCoreError::FecDecodingFailed`] if the header payload is FEC
/// wrapped and cannot be corrected.
pub fn read_header(bytes: &[u8]) -> Result<(V2FileHeader, usize), VaultCoreError> {
    if bytes.len() < FIXED_PREAMBLE_LEN {
        return Err(VaultCoreError::CorruptedFile(format!(
            "file too short: {} bytes (minimum {FIXED_PREAMBLE_LEN})",
            bytes.len()
        )));
    }

    if bytes[..4] != VAULT_MAGIC {
        return Err(VaultCoreError::CorruptedFile("invalid magic bytes".into()));
    }

    let version = u32::from_le_bytes(bytes[4..8].try_into().expect("4-byte slice"));
    if version != VAULT_VERSION_V2 {
        return Err(VaultCoreError::UnsupportedVersion(version));
    }

    let pbkdf2_iterations = u32::from_le_bytes(bytes[8..12].try_into().expect("4-byte slice"));
    let header_size = u32::from_le_bytes(bytes[12..16].try_into().expect("4-byte slice"));
    let header_size_usize = header_size as usize;

    if header_size == 0 || header_size_usize > MAX_HEADER_SIZE {
        return Err(VaultCoreError::CorruptedFile(format!(
            "header_size {header_size} out of bounds (1..={MAX_HEADER_SIZE})"
        )));
    }

    let remaining_after_preamble = bytes
        .len()
        .checked_sub(FIXED_PREAMBLE_LEN)
        .ok_or_else(|| VaultCoreError::CorruptedFile("preamble length underflow".into()))?;
    if header_size_usize > remaining_after_preamble {
        return Err(VaultCoreError::CorruptedFile(format!(
            "header_size {header_size} exceeds remaining file bytes {remaining_after_preamble}"
        )));
    }

    if bytes.len() < HEADER_DATA_OFFSET {
        return Err(VaultCoreError::CorruptedFile(
            "file too short to read header_flags".into(),
        ));
    }
    let header_flags = bytes[FIXED_PREAMBLE_LEN];

    // H = header_size - 1 (header_size includes the flags byte itself).
    let h = header_size_usize
        .checked_sub(1)
        .ok_or_else(|| VaultCoreError::CorruptedFile("header_size underflow".into()))?;

    // `remaining_after_preamble` counts everything after the fixed preamble:
    // the header_flags byte itself, then H bytes of header_data_section,
    // then salt + IV. The required tail is therefore H + 1 + 44, not H + 44
    // — omitting the flags byte here would let a buffer exactly one byte
    // short of the true minimum pass this check and panic on the salt/IV
    // slice below instead of being rejected as corrupted.
    let tail_len = h
        .checked_add(1)
        .and_then(|n| n.checked_add(SALT_AND_IV_LEN))
        .ok_or_else(|| VaultCoreError::CorruptedFile("header tail length overflow".into()))?;
    if tail_len > remaining_after_preamble {
        return Err(VaultCoreError::CorruptedFile(format!(
            "header + flags + salt + iv ({tail_len} bytes) exceeds remaining file bytes {remaining_after_preamble}"
        )));
    }

    let header_data_end = HEADER_DATA_OFFSET
        .checked_add(h)
        .ok_or_else(|| VaultCoreError::CorruptedFile("header data section overflow".into()))?;
    let header_data_section = &bytes[HEADER_DATA_OFFSET..header_data_end];

    let (vault_header, fec_redundancy_percent) = if header_flags & HEADER_FLAG_FEC_ENABLED != 0 {
        if h < FEC_WRAPPER_PREFIX_LEN {
            return Err(VaultCoreError::CorruptedFile(format!(
                "FEC header section too short: {h} bytes (minimum {FEC_WRAPPER_PREFIX_LEN})"
            )));
        }
        let stored_redundancy = header_data_section[0];
        let original_size = u32::from_be_bytes(
            header_data_section[1..5]
                .try_into()
                .expect("4-byte slice"),
        );
        let encoded_bytes = &header_data_section[FEC_WRAPPER_PREFIX_LEN..];

        let effective = stored_redundancy.max(MIN_HEADER_FEC_REDUNDANCY);
        // `effective` only governs decode correction power implicitly
        // through the RS block geometry (fixed 32 parity bytes per
        // block); it is not threaded further, matching encode's
        // own treatment of num_parity_blocks as metadata.
        let _ = effective;
        let decoded = rs_codec::decode(encoded_bytes, original_size)
            .map_err(VaultCoreError::FecDecodingFailed)?;
        (decoded, stored_redundancy)
    } else {
        (header_data_section.to_vec(), 0u8)
    };

    let salt_start = header_data_end;
    let salt_end = salt_start
        .checked_add(DATA_SALT_LEN)
        .ok_or_else(|| VaultCoreError::CorruptedFile("data_salt offset overflow".into()))?;
    let iv_start = salt_end;
    let iv_end = iv_start
        .checked_add(DATA_IV_LEN)
        .ok_or_else(|| VaultCoreError::CorruptedFile("data_iv offset overflow".into()))?;

    let mut data_salt = [0u8; DATA_SALT_LEN];
    data_salt.copy_from_slice(&bytes[salt_start..salt_end]);
    let mut data_iv = [0u8; DATA_IV_LEN];
    data_iv.copy_from_slice(&bytes[iv_start..iv_end]);

    let body_offset = iv_end;

    let header = V2FileHeader {
        magic: VAULT_MAGIC,
        version,
        pbkdf2_iterations,
        header_size,
        header_flags,
        vault_header,
        data_salt,
        data_iv,
        fec_redundancy_percent,
    };

    Ok((header, body_offset))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
