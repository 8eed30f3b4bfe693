//! Fuzz target for opening arbitrary bytes as an archive.
//!
//! Writes the fuzzer's input to disk and runs a full extraction over it.
//! Malformed containers must surface as errors, never as panics, and
//! nothing may ever land outside the destination directory.
//!
//! Run with: cargo +nightly fuzz run archive_open

#![no_main]

use libfuzzer_sys::fuzz_target;

use zipnest::{UnzipOptions, unzip};

fuzz_target!(|data: &[u8]| {
    let dir = match tempfile::tempdir() {
        Ok(dir) => dir,
        Err(_) => return,
    };
    let archive = dir.path().join("input.zip");
    if std::fs::write(&archive, data).is_err() {
        return;
    }

    let dest = dir.path().join("out");
    // Errors are expected for garbage input; panics are the bug.
    let _ = unzip(&archive, &dest, &UnzipOptions::new());
});
