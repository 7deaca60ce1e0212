#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

//! Property tests for the vault container header round-trip.

use proptest::prelude::*;
use vaultcore::{read_header, write_header};

proptest! {
    #[test]
    fn header_roundtrips_for_any_payload_and_redundancy(
        vault_header in prop::collection::vec(any::<u8>(), 1..4096),
        pbkdf2_iterations in any::<u32>(),
        data_salt in prop::array::uniform32(any::<u8>()),
        data_iv in prop::array::uniform12(any::<u8>()),
        enable_fec in any::<bool>(),
        // write_header feeds max(20, user_redundancy) straight to the RS
        // codec, which only accepts 5..=50 — values above 50 are a caller
        // contract violation, not something write_header is expected to
        // survive, so keep the sampled preference within that ceiling.
        user_redundancy in 0u8..=50,
    ) {
        let blob = write_header(
            &vault_header,
            pbkdf2_iterations,
            data_salt,
            data_iv,
            enable_fec,
            user_redundancy,
        ).expect("write_header should succeed for non-empty payloads");

        let (header, body_offset) = read_header(&blob).expect("read_header should recover an untouched blob");

        prop_assert_eq!(header.vault_header, vault_header);
        prop_assert_eq!(header.pbkdf2_iterations, pbkdf2_iterations);
        prop_assert_eq!(header.data_salt, data_salt);
        prop_assert_eq!(header.data_iv, data_iv);
        prop_assert_eq!(body_offset, blob.len());

        if enable_fec {
            prop_assert_eq!(header.fec_redundancy_percent, user_redundancy);
        } else {
            prop_assert_eq!(header.fec_redundancy_percent, 0);
        }
    }
}
