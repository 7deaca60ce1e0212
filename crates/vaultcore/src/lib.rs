//! `vaultcore` — the encrypted vault container core.
//!
//! This crate is the audit target: zero network, zero async, zero GUI
//! dependencies. It owns exactly four subsystems: the vault container file
//! format (header preamble, optional header FEC), the Reed–Solomon codec
//! that backs that FEC, password-history hashing with constant-time reuse
//! detection, and a static common-password weakness screen. Everything
//! else — account storage, the GUI/CLI shell, per-entry encryption, KEK
//! derivation, hardware-token flows — is a collaborator's concern and
//! lives outside this crate.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod common_password;
pub mod error;
pub mod memory;
pub mod password_history;
pub mod rs_codec;
pub mod vault_format;

pub use common_password::is_common_password;
pub use error::{RsError, VaultCoreError};
pub use memory::{disable_core_dumps, LockedRegion, SecretBuffer, SecretBytes};
pub use password_history::{
    add_to_history, hash_password, is_password_reused, set_test_iterations, trim_history,
    PasswordHistoryEntry,
};
pub use rs_codec::{
    calculate_encoded_size, decode as rs_decode, encode as rs_encode, EncodedData,
    MAX_REDUNDANCY_PERCENT, MIN_REDUNDANCY_PERCENT, RS_BLOCK_SIZE, RS_DATA_SIZE, RS_PARITY_SIZE,
};
pub use vault_format::{
    detect_version, is_valid_v2_vault, read_header, write_header, V2FileHeader,
    HEADER_FLAG_FEC_ENABLED, MAX_HEADER_SIZE, MIN_HEADER_FEC_REDUNDANCY, VAULT_MAGIC,
    VAULT_VERSION_V2,
};
