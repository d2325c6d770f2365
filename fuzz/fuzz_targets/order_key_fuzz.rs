//! Fuzz test for caller-facing order key and phase parsing
//!
//! Sort keys, phase names, and directions arrive straight off the query
//! string, so the parsers must take arbitrary UTF-8 without panicking.
//! Beyond crash-freedom this checks:
//! - recognized tokens parse identically regardless of ASCII case;
//! - phase values round-trip through their canonical short code;
//! - rejected directions carry a non-empty error message.
//!
//! Run with: cargo +nightly fuzz run order_key_fuzz -- -max_total_time=60

#![no_main]

use dailies_core::{Phase, SortDirection, SortKey};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Query-string values are always valid UTF-8 by the time they reach us
    if let Ok(input) = std::str::from_utf8(data) {
        let parsed = SortKey::parse(input);

        // Recognition must not depend on ASCII case
        assert_eq!(
            parsed,
            SortKey::parse(&input.to_ascii_uppercase()),
            "order key parsing should be ASCII-case-insensitive"
        );
        assert_eq!(
            parsed,
            SortKey::parse(&input.to_ascii_lowercase()),
            "order key parsing should be ASCII-case-insensitive"
        );

        // A recognized phase always round-trips through its code
        if let Ok(phase) = input.parse::<Phase>() {
            assert_eq!(
                phase.code().parse::<Phase>(),
                Ok(phase),
                "phase short codes should be canonical"
            );
        }

        // Directions either parse or report the offending token
        if let Err(message) = input.parse::<SortDirection>() {
            assert!(
                !message.is_empty(),
                "direction parse errors should carry a message"
            );
        }
    }
});
