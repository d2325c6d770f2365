//! Fuzz test for REST query parameter lowering
//!
//! Every pivot and event-listing parameter is an untrusted string or an
//! untrusted number. Lowering into typed descriptors must never panic:
//! unknown phases become errors, bogus order keys fall back to the default
//! ordering, and extreme numeric values clamp instead of overflowing.
//!
//! Run with: cargo +nightly fuzz run params_fuzz -- -max_total_time=60

#![no_main]

use dailies_api::{EventListParams, PivotPageParams};
use libfuzzer_sys::fuzz_target;

fn field(parts: &[&str], index: usize) -> Option<String> {
    parts.get(index).map(|s| s.to_string())
}

/// Page numbers from raw bytes, biased toward the overflow-prone extremes.
fn number(data: &[u8], index: usize) -> Option<i64> {
    data.get(index).map(|&b| match b % 4 {
        0 => i64::MIN,
        1 => i64::MAX,
        2 => -1,
        _ => b as i64,
    })
}

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let parts: Vec<&str> = input.split('\n').collect();

        let params = PivotPageParams {
            project: field(&parts, 0),
            root: field(&parts, 1),
            name: field(&parts, 2),
            phase: field(&parts, 3),
            approval: field(&parts, 4),
            work: field(&parts, 5),
            order: field(&parts, 6),
            direction: field(&parts, 7),
            limit: number(data, 0),
            offset: number(data, 1),
        };

        match params.into_query() {
            Ok(query) => {
                // Whatever came over the wire, the page window is sane
                let (_, limit) = query.page_bounds();
                assert!(limit >= 1, "page limit should never collapse to zero");
            }
            Err(error) => {
                assert!(
                    !error.to_string().is_empty(),
                    "rejections should carry a message"
                );
            }
        }

        let listing = EventListParams {
            project: field(&parts, 0),
            root: field(&parts, 1),
            phase: field(&parts, 3),
            name: field(&parts, 2),
            relation: field(&parts, 8),
            latest: data.first().map(|&b| b % 2 == 0),
            include_deleted: data.get(1).map(|&b| b % 2 == 0),
            limit: number(data, 2),
            offset: number(data, 3),
        };
        let _ = listing.into_filter();
    }
});
