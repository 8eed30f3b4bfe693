//! Fuzz target for path normalization and containment checks.
//!
//! Feeds arbitrary entry names through the same lexical pipeline the
//! extractor uses and asserts the security property directly: whatever
//! the input, a path judged contained must sit at or below the root
//! after normalization.
//!
//! Run with: cargo +nightly fuzz run containment

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::path::Path;

use zipnest::safety::{is_contained, normalize_lexically};

fuzz_target!(|data: &[u8]| {
    let Ok(name) = std::str::from_utf8(data) else {
        return;
    };

    let root = Path::new("/extract/root");
    let candidate = normalize_lexically(&root.join(name));

    if is_contained(&candidate, root) {
        // A contained path must start at the root on whole-segment
        // boundaries and must carry no remaining parent steps.
        assert!(
            candidate.starts_with(root),
            "contained path does not start with root: {candidate:?}"
        );
        assert!(
            !candidate
                .components()
                .any(|c| matches!(c, std::path::Component::ParentDir)),
            "contained path kept a parent step: {candidate:?}"
        );
    }

    // Normalization must be idempotent
    assert_eq!(normalize_lexically(&candidate), candidate);
});
