//! Fuzz target for archive shape classification.
//!
//! Splits arbitrary bytes into entry names and checks that classification
//! never panics on non-empty input and stays consistent with the entry
//! list's depth structure.
//!
//! Run with: cargo +nightly fuzz run classify

#![no_main]

use libfuzzer_sys::fuzz_target;

use zipnest::shape::classify;
use zipnest::{ArchiveShape, Entry, EntryKind};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let entries: Vec<Entry> = text
        .split('\n')
        .filter(|name| !name.is_empty())
        .take(64)
        .enumerate()
        .map(|(index, name)| Entry {
            index,
            name: name.to_string(),
            kind: if name.ends_with('/') {
                EntryKind::Directory
            } else {
                EntryKind::File
            },
            checksum: 0,
            size: 0,
            unix_mode: None,
            modified: None,
        })
        .collect();
    if entries.is_empty() {
        return;
    }

    let refs: Vec<&Entry> = entries.iter().collect();
    let shape = classify(&refs);

    match shape {
        ArchiveShape::Singleton => assert_eq!(entries.len(), 1),
        ArchiveShape::Wrapped { folder } => {
            // The wrapper name comes from a real entry with separators
            // stripped, so it never contains one.
            assert!(!folder.contains('/'));
            assert!(entries.len() > 1);
        }
        ArchiveShape::Flat => assert!(entries.len() > 1),
    }
});
