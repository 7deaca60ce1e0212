//! Common-password weakness screen.
//!
//! This module provides [`is_common_password`], a static blacklist check
//! used when enrolling or rotating a credential. It never touches disk —
//! the blacklist is a compile-time array baked into the binary, on the
//! assumption that the filesystem may be hostile at the point this check
//! runs.
//!
//! The check is two-layered:
//! 1. An exact match (case-folded) against the full blacklist.
//! 2. A substring match against entries at least 6 characters long that
//!    are not a single-character repetition — this catches weak
//!    prefixing/suffixing (`"password$2024"`) without letting an entry
//!    like `"aaaaaaaa"` trivially match any password containing `"aa"`.

/// Minimum blacklist-entry length eligible for substring matching.
const MIN_SUBSTRING_LEN: usize = 6;

/// The static common-password blacklist: 227 lowercase strings covering
/// top breached passwords, keyboard patterns, sequential digits, common
/// names and words, years 1990–2024, and leetspeak variants.
pub const BLACKLIST: &[&str] = &[
    // Breached / top-reused passwords
    "password", "123456", "12345678", "123456789", "1234567890", "12345", "1234567", "qwerty",
    "qwerty123", "password1", "abc123", "admin", "welcome", "monkey", "dragon", "letmein",
    "football", "baseball", "master", "superman", "trustno1", "sunshine", "princess", "flower",
    "hottie", "loveme", "starwars", "whatever", "shadow", "michael", "jennifer", "jordan", "hunter",
    "buster", "soccer", "harley", "ranger", "daniel", "george", "computer", "michelle", "jessica",
    "pepper", "ashley", "amanda", "andrew", "joshua", "biteme", "freedom", "batman", "thomas",
    "robert", "access", "yankees", "thunder", "taylor", "matrix", "passw0rd", "p@ssw0rd",
    "iloveyou", "666666", "7777777", "121212", "000000", "123123", "1q2w3e4r", "1qaz2wsx", "qazwsx",
    "zaq12wsx", "qwertyui", "chocolate", "cheese", "iloveyou2", "iloveu", "123abc", "abcd1234",
    "aaaaaa", "qweasd", "asdzxc", "woaini", "letmein123", "welcome123", "password123", "654321",
    "987654321", "baseball1", "football1", "basketball", "hockey", "wrestler", "pokemon", "cookie",
    "summer", "winter", "autumn", "123654", "112233", "samsung", "iphone", "internet", "secret",
    "nothing", "ginger", "qwertyqwerty",
    // Keyboard-walk patterns
    "qwertyuiop", "asdfghjkl", "zxcvbnm", "qweasdzxc", "asdf1234", "poiuytrewq", "mnbvcxzl",
    "qazxsw", "qweqwe", "asdasd", "zxczxc", "trewqaz", "wsxedcrf", "edcrfvtg", "rfvtgbyh",
    "yhnujmik",
    // Sequential digit runs
    "111111", "222222", "232323", "101010",
    // Common given names and pet names
    "christopher", "matthew", "david", "sarah", "joseph", "samantha", "elizabeth", "nicole", "ryan",
    "stephanie", "brandon", "rachel", "justin", "lauren", "william", "megan", "anthony", "jennie",
    "charlie", "maggie", "buddy", "lucky", "angel", "sophie", "chelsea", "diamond", "peanut",
    "tigger", "smokey", "casper", "maxwell", "oliver", "bella", "lucy", "daisy", "molly",
    // Years 1990-2024
    "1990", "1991", "1992", "1993", "1994", "1995", "1996", "1997", "1998", "1999", "2000", "2001",
    "2002", "2003", "2004", "2005", "2006", "2007", "2008", "2009", "2010", "2011", "2012", "2013",
    "2014", "2015", "2016", "2017", "2018", "2019", "2020", "2021", "2022", "2023", "2024",
    // Leetspeak variants
    "p4ssword", "l3tmein", "adm1n", "qwe123", "tr0ubl3", "d3struct0r", "b4seball", "m0nkey",
    "fr33dom", "sh4dow", "dr4gon", "st4rwars", "wint3r", "summ3r", "0123456789", "a1b2c3",
    "c0mput3r", "s3cr3t",
    // Miscellaneous common weak passwords
    "sweetheart", "snickers", "rainbow", "butterfly", "dolphin", "tinkerbell", "spongebob",
    "letmeinnow", "changeme", "default", "guest", "temppass", "backup", "aaaaaaaa",
];

/// Returns `true` if `password` exactly equals, or (subject to the
/// length/repetition guards) contains, an entry from [`BLACKLIST`].
///
/// The comparison is ASCII case-insensitive: `password` is lowercased
/// before matching.
#[must_use]
pub fn is_common_password(password: &str) -> bool {
    let lowered = password.to_ascii_lowercase();

    if BLACKLIST.contains(&lowered.as_str()) {
        return true;
    }

    BLACKLIST
        .iter()
        .any(|entry| entry.len() >= MIN_SUBSTRING_LEN && !is_single_char_repetition(entry) && lowered.contains(entry))
}

/// Returns `true` if every byte in `s` is identical (e.g. `"aaaaaaaa"`).
///
/// Single-character-repetition entries are excluded from substring
/// matching: without this guard, an entry like `"aaaaaaaa"` would match
/// any password containing so much as `"aa"` through substring
/// expansion, which would make the screen useless against short,
/// unrelated passwords. Exact matches of these entries are still caught
/// by the exact-match check above.
fn is_single_char_repetition(s: &str) -> bool {
    let bytes = s.as_bytes();
    match bytes.first() {
        Some(&first) => bytes.iter().all(|&b| b == first),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blacklist_has_227_entries() {
        assert_eq!(BLACKLIST.len(), 227);
    }

    #[test]
    fn blacklist_entries_are_unique() {
        let mut sorted = BLACKLIST.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), BLACKLIST.len());
    }

    #[test]
    fn blacklist_entries_are_lowercase() {
        for entry in BLACKLIST {
            assert_eq!(*entry, entry.to_ascii_lowercase());
        }
    }

    #[test]
    fn exact_match_is_case_insensitive() {
        assert!(is_common_password("Password"));
        assert!(is_common_password("PASSWORD"));
        assert!(is_common_password("password"));
    }

    #[test]
    fn substring_match_catches_weak_suffixing() {
        assert!(is_common_password("MyP@ssw0rd_2024"));
    }

    #[test]
    fn short_password_is_not_flagged_by_repetition_entries() {
        assert!(!is_common_password("aa"));
    }

    #[test]
    fn repetition_entry_still_matches_exactly() {
        assert!(is_common_password("aaaaaaaa"));
        assert!(is_common_password("AAAAAAAA"));
    }

    #[test]
    fn repetition_entry_does_not_match_as_substring() {
        // "aaaaaaaa" must not cause "aa"-containing passwords to match
        // via substring expansion.
        assert!(!is_common_password("baaab"));
    }

    #[test]
    fn unrelated_password_is_not_flagged() {
        assert!(!is_common_password("Xk9#mQ7$pL2vR"));
    }

    #[test]
    fn short_blacklist_entries_require_exact_match() {
        // "1990" is only 4 characters — below MIN_SUBSTRING_LEN — so it
        // must not match as a substring of an unrelated longer string.
        assert!(!is_common_password("x1990x"));
        assert!(is_common_password("1990"));
    }

    #[test]
    fn substring_guard_respects_minimum_length() {
        assert!(MIN_SUBSTRING_LEN == 6);
        for entry in BLACKLIST {
            if entry.len() < MIN_SUBSTRING_LEN {
                // Entry is short enough that it should never match via
                // substring search, only exact match.
                let padded = format!("xx{entry}xx");
                if !is_single_char_repetition(entry) {
                    // Short entries are excluded from substring search
                    // by length alone; confirm the guard actually
                    // excludes them (no false positive from another,
                    // longer, overlapping entry).
                    let matched_by_something_else = BLACKLIST.iter().any(|other| {
                        other.len() >= MIN_SUBSTRING_LEN
                            && !is_single_char_repetition(other)
                            && padded.contains(other)
                    });
                    assert_eq!(is_common_password(&padded), matched_by_something_else);
                }
            }
        }
    }
}
