//! Password history — salted PBKDF2-HMAC-SHA512 hashing, constant-time
//! reuse detection, FIFO retention.
//!
//! This module provides:
//! - [`hash_password`] — salt + hash a password into a [`PasswordHistoryEntry`]
//! - [`is_password_reused`] — constant-time match against a history list
//! - [`add_to_history`] — append-then-trim with FIFO retention
//! - [`trim_history`] — drop the oldest entries beyond `max_depth`
//!
//! # Constant-time discipline
//!
//! [`is_password_reused`] recomputes PBKDF2 against *every* history
//! entry's salt and OR-accumulates the comparisons with [`subtle`]'s
//! [`Choice`](subtle::Choice) — the loop never exits early on a match,
//! so the total running time depends only on `history.len()`, never on
//! where (or whether) a match occurred. The one exception is the
//! empty-password short-circuit, which spec intentionally keeps outside
//! the constant-time envelope (see module-level design note below).

use crate::error::VaultCoreError;
use crate::memory::SecretBuffer;
use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha512;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Once;
use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroize;

/// Default PBKDF2-HMAC-SHA512 iteration count.
pub const PBKDF2_ITERATIONS: u32 = 600_000;

/// Salt length in bytes.
pub const SALT_LEN: usize = 32;

/// Hash output length in bytes.
pub const HASH_LEN: usize = 48;

/// Process-wide override for the PBKDF2 iteration count.
///
/// An anti-pattern preserved for transparency: production code must
/// never change this concurrently with active hashing operations. Only
/// test harnesses should call [`set_test_iterations`]. `0` means "use
/// the default [`PBKDF2_ITERATIONS`]".
static TEST_ITERATIONS_OVERRIDE: AtomicU32 = AtomicU32::new(0);

/// Override the PBKDF2 iteration count for the remainder of the process.
///
/// Intended for test harnesses only, to keep test suites fast. This is
/// process-wide mutable state: it MUST NOT be changed concurrently with
/// active hashing operations. A correct caller confines it to test
/// harnesses and sets it once, before spawning any work.
pub fn set_test_iterations(iterations: u32) {
    TEST_ITERATIONS_OVERRIDE.store(iterations, Ordering::SeqCst);
}

fn active_iterations() -> u32 {
    match TEST_ITERATIONS_OVERRIDE.load(Ordering::SeqCst) {
        0 => PBKDF2_ITERATIONS,
        overridden => overridden,
    }
}

/// A single retained password-history record.
#[derive(Debug, Clone)]
pub struct PasswordHistoryEntry {
    /// Seconds since the Unix epoch when this entry was created.
    pub timestamp: u64,
    /// 32-byte salt unique to this entry.
    pub salt: Vec<u8>,
    /// 48-byte PBKDF2-HMAC-SHA512 output.
    pub hash: Vec<u8>,
}

impl Drop for PasswordHistoryEntry {
    fn drop(&mut self) {
        self.salt.zeroize();
        self.hash.zeroize();
    }
}

/// Hash `password` into a new [`PasswordHistoryEntry`] with a fresh
/// random salt.
///
/// # Errors
///
/// Returns [`VaultCoreError::InvalidData`] if `password` is empty.
/// Returns [`VaultCoreError::CryptoError`] if the CSPRNG fails to
/// produce a salt.
pub fn hash_password(password: &str) -> Result<PasswordHistoryEntry, VaultCoreError> {
    if password.is_empty() {
        return Err(VaultCoreError::InvalidData("password must not be empty".into()));
    }

    let mut salt = vec![0u8; SALT_LEN];
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| VaultCoreError::CryptoError(format!("CSPRNG fill failed: {e}")))?;

    let hash = pbkdf2_sha512(password.as_bytes(), &salt, active_iterations());

    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Ok(PasswordHistoryEntry {
        timestamp,
        salt,
        hash,
    })
}

/// Compute the PBKDF2-HMAC-SHA512 hash for `password` under `salt`.
fn pbkdf2_sha512(password: &[u8], salt: &[u8], iterations: u32) -> Vec<u8> {
    let mut buf = vec![0u8; HASH_LEN];
    // The `pbkdf2` crate does not expose a fallible entry point for this
    // output length/iteration combination; it cannot fail for any input.
    pbkdf2_hmac::<Sha512>(password, salt, iterations, &mut buf);
    buf
}

/// Returns `true` if `password` matches any entry in `history`.
///
/// Traverses the *entire* history unconditionally — no early exit on
/// match — so that an observer timing this call learns nothing about
/// whether, or where, a match occurred. A PBKDF2 recomputation failure
/// for one entry is logged and that entry is skipped; it does not abort
/// the loop (see [`crate::error`] propagation policy).
///
/// Returns `false` immediately, before any PBKDF2 work, if `password` or
/// `history` is empty. This is an intentional, documented exception to
/// the constant-time guarantee: an empty password is never a real
/// submission and carries no secret worth protecting the timing of.
#[must_use]
pub fn is_password_reused(password: &str, history: &[PasswordHistoryEntry]) -> bool {
    if password.is_empty() || history.is_empty() {
        return false;
    }

    let password_bytes = match SecretBuffer::new(password.as_bytes()) {
        Ok(buf) => buf,
        Err(_) => return false,
    };

    let mut any_match = Choice::from(0u8);
    for entry in history {
        let iterations = active_iterations();
        if entry.salt.len() != SALT_LEN || entry.hash.len() != HASH_LEN {
            log_skipped_entry();
            continue;
        }
        let mut candidate = pbkdf2_sha512(password_bytes.expose(), &entry.salt, iterations);
        any_match |= candidate.ct_eq(&entry.hash);
        candidate.zeroize();
    }

    any_match.into()
}

/// Log (once per process, via `eprintln!`) that a history entry was
/// skipped during reuse detection due to malformed salt/hash lengths.
///
/// Mirrors the one-shot diagnostic idiom used elsewhere in this crate
/// for non-fatal, expected-rare conditions.
fn log_skipped_entry() {
    static WARNED: Once = Once::new();
    WARNED.call_once(|| {
        eprintln!(
            "[vaultcore] WARNING: skipped a malformed password-history entry during reuse check"
        );
    });
}

/// Append `entry` to `history`, then trim to `max_depth` (FIFO — oldest
/// first).
///
/// If `max_depth` is `0`, history retention is disabled: `history` is
/// cleared (the new entry is not retained either).
pub fn add_to_history(
    history: &mut Vec<PasswordHistoryEntry>,
    entry: PasswordHistoryEntry,
    max_depth: usize,
) {
    if max_depth == 0 {
        history.clear();
        return;
    }
    history.push(entry);
    trim_history(history, max_depth);
}

/// Remove the oldest entries from `history` until at most `max_depth`
/// remain, preserving insertion order of the survivors.
///
/// If `max_depth` is `0`, clears `history` entirely.
pub fn trim_history(history: &mut Vec<PasswordHistoryEntry>, max_depth: usize) {
    if max_depth == 0 {
        history.clear();
        return;
    }
    if history.len() > max_depth {
        let excess = history.len().saturating_sub(max_depth);
        history.drain(0..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_password_rejects_empty() {
        assert!(matches!(
            hash_password(""),
            Err(VaultCoreError::InvalidData(_))
        ));
    }

    #[test]
    fn hash_password_produces_expected_lengths() {
        set_test_iterations(10);
        let entry = hash_password("correct horse battery staple").expect("hash should succeed");
        assert_eq!(entry.salt.len(), SALT_LEN);
        assert_eq!(entry.hash.len(), HASH_LEN);
    }

    #[test]
    fn hash_password_uses_unique_salts() {
        set_test_iterations(10);
        let a = hash_password("same-password").expect("hash should succeed");
        let b = hash_password("same-password").expect("hash should succeed");
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn is_password_reused_detects_own_hash() {
        set_test_iterations(10);
        let entry = hash_password("hunter2").expect("hash should succeed");
        assert!(is_password_reused("hunter2", std::slice::from_ref(&entry)));
    }

    #[test]
    fn is_password_reused_rejects_different_password() {
        set_test_iterations(10);
        let entry = hash_password("hunter2").expect("hash should succeed");
        assert!(!is_password_reused(
            "different-password",
            std::slice::from_ref(&entry)
        ));
    }

    #[test]
    fn is_password_reused_empty_history_is_false() {
        assert!(!is_password_reused("anything", &[]));
    }

    #[test]
    fn is_password_reused_empty_password_is_false() {
        set_test_iterations(10);
        let entry = hash_password("hunter2").expect("hash should succeed");
        assert!(!is_password_reused("", std::slice::from_ref(&entry)));
    }

    #[test]
    fn is_password_reused_checks_across_multiple_entries() {
        set_test_iterations(10);
        let e1 = hash_password("first").expect("hash should succeed");
        let e2 = hash_password("second").expect("hash should succeed");
        let e3 = hash_password("third").expect("hash should succeed");
        let history = vec![e1, e2, e3];

        assert!(is_password_reused("second", &history));
        assert!(!is_password_reused("fourth", &history));
    }

    #[test]
    fn add_to_history_appends_and_trims() {
        set_test_iterations(10);
        let mut history = Vec::new();
        for label in ["e1", "e2", "e3", "e4", "e5"] {
            let entry = hash_password(label).expect("hash should succeed");
            add_to_history(&mut history, entry, 3);
        }
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn add_to_history_zero_depth_disables_retention() {
        set_test_iterations(10);
        let mut history = Vec::new();
        let entry = hash_password("whatever").expect("hash should succeed");
        add_to_history(&mut history, entry, 0);
        assert!(history.is_empty());
    }

    #[test]
    fn trim_history_preserves_most_recent_in_order() {
        set_test_iterations(10);
        let mut history = Vec::new();
        for i in 0..5 {
            history.push(PasswordHistoryEntry {
                timestamp: u64::from(i),
                salt: vec![0u8; SALT_LEN],
                hash: vec![0u8; HASH_LEN],
            });
        }
        trim_history(&mut history, 3);
        let timestamps: Vec<u64> = history.iter().map(|e| e.timestamp).collect();
        assert_eq!(timestamps, vec![2, 3, 4]);
    }

    #[test]
    fn trim_history_is_idempotent() {
        let mut history: Vec<PasswordHistoryEntry> = (0..5)
            .map(|i| PasswordHistoryEntry {
                timestamp: i,
                salt: vec![0u8; SALT_LEN],
                hash: vec![0u8; HASH_LEN],
            })
            .collect();
        trim_history(&mut history, 3);
        let once = history.iter().map(|e| e.timestamp).collect::<Vec<_>>();
        trim_history(&mut history, 3);
        let twice = history.iter().map(|e| e.timestamp).collect::<Vec<_>>();
        assert_eq!(once, twice);
    }

    #[test]
    fn trim_history_zero_depth_clears() {
        let mut history: Vec<PasswordHistoryEntry> = (0..3)
            .map(|i| PasswordHistoryEntry {
                timestamp: i,
                salt: vec![0u8; SALT_LEN],
                hash: vec![0u8; HASH_LEN],
            })
            .collect();
        trim_history(&mut history, 0);
        assert!(history.is_empty());
    }

    #[test]
    fn skipped_entry_does_not_abort_the_loop() {
        set_test_iterations(10);
        let good = hash_password("good-password").expect("hash should succeed");
        let malformed = PasswordHistoryEntry {
            timestamp: 0,
            salt: vec![0u8; 4], // wrong length
            hash: vec![0u8; HASH_LEN],
        };
        let history = vec![malformed, good];
        assert!(is_password_reused("good-password", &history));
    }
}
