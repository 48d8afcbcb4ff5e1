#![no_main]

//! Session fuzzer.
//!
//! Feeds raw bytes through the batch session driver. Any input must be
//! answered without panicking, and every rejected line must be reported
//! with its own line number.

use gamma::game::check_invariants;
use gamma::session::{self, SessionEnd};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Numbers of at most three digits keep header boards small.
    if data.len() > 4096 || data.windows(4).any(|w| w.iter().all(u8::is_ascii_digit)) {
        return;
    }

    let mut out = Vec::new();
    let mut err = Vec::new();
    let Ok(end) = session::run(data, &mut out, &mut err) else {
        return;
    };

    let lines = data.split(|&b| b == b'\n').count() as u64;
    for report in String::from_utf8_lossy(&err).lines() {
        let number: u64 = report
            .strip_prefix("ERROR ")
            .and_then(|n| n.parse().ok())
            .unwrap_or_else(|| panic!("unexpected diagnostic {report:?}"));
        assert!(number >= 1 && number <= lines);
    }

    if let SessionEnd::Batch(game) | SessionEnd::Interactive { game, .. } = end {
        let violations = check_invariants(&game);
        assert!(violations.is_empty(), "{violations:?}");
    }
});
