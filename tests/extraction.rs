//! End-to-end extraction tests against hand-crafted archives.

mod common;

use common::{ArchiveBuilder, corrupt_payload, tree_paths, write_archive};
use zipnest::{Error, UnzipOptions, unzip};

#[test]
fn test_singleton_file_lands_directly_in_destination() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("report.zip");
    write_archive(&archive, &[("report.pdf", b"pdf bytes")]);

    let dest = dir.path().join("out");
    unzip(&archive, &dest, &UnzipOptions::new()).unwrap();

    assert_eq!(std::fs::read(dest.join("report.pdf")).unwrap(), b"pdf bytes");
    assert_eq!(tree_paths(&dest), ["report.pdf"]);
}

#[test]
fn test_singleton_conflicts_count_upward() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("report.zip");
    write_archive(&archive, &[("report.pdf", b"fresh")]);

    std::fs::write(dir.path().join("report.pdf"), b"first").unwrap();
    std::fs::write(dir.path().join("report 2.pdf"), b"second").unwrap();

    unzip(&archive, dir.path(), &UnzipOptions::new()).unwrap();

    assert_eq!(
        std::fs::read(dir.path().join("report 3.pdf")).unwrap(),
        b"fresh"
    );
    assert_eq!(std::fs::read(dir.path().join("report.pdf")).unwrap(), b"first");
}

#[test]
fn test_zip_extension_is_not_split_by_conflict_renaming() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("outer.zip");
    write_archive(&archive, &[("inner.zip", b"nested archive")]);

    std::fs::write(dir.path().join("inner.zip"), b"taken").unwrap();
    unzip(&archive, dir.path(), &UnzipOptions::new()).unwrap();

    // "inner 2.zip" would look like a different archive; the counter goes
    // after the full name instead.
    assert!(dir.path().join("inner.zip 2").exists());
    assert!(!dir.path().join("inner 2.zip").exists());
}

#[test]
fn test_wrapped_archive_keeps_its_own_folder() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("proj.zip");
    write_archive(
        &archive,
        &[
            ("proj/", b""),
            ("proj/readme.md", b"hello"),
            ("proj/src/", b""),
            ("proj/src/main.rs", b"fn main() {}"),
        ],
    );

    let dest = dir.path().join("out");
    unzip(&archive, &dest, &UnzipOptions::new()).unwrap();

    assert_eq!(
        tree_paths(&dest),
        ["proj", "proj/readme.md", "proj/src", "proj/src/main.rs"]
    );
}

#[test]
fn test_wrapped_conflict_renames_the_wrapper_once() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("proj.zip");
    write_archive(&archive, &[("proj/", b""), ("proj/a.txt", b"a")]);

    std::fs::create_dir(dir.path().join("proj")).unwrap();
    unzip(&archive, dir.path(), &UnzipOptions::new()).unwrap();

    assert_eq!(std::fs::read(dir.path().join("proj 2/a.txt")).unwrap(), b"a");
}

#[test]
fn test_missing_wrapper_entry_reads_as_flat() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("bundle.zip");
    // Without the folder's own entry the two files tie at the minimum
    // depth, so this is flat and gets gathered under the archive's stem.
    write_archive(&archive, &[("proj/a.txt", b"a"), ("proj/b.txt", b"b")]);

    let dest = dir.path().join("out");
    unzip(&archive, &dest, &UnzipOptions::new()).unwrap();

    assert_eq!(
        tree_paths(&dest),
        ["bundle", "bundle/proj", "bundle/proj/a.txt", "bundle/proj/b.txt"]
    );
}

#[test]
fn test_flat_archive_is_gathered_under_archive_name() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("bundle.zip");
    write_archive(
        &archive,
        &[("a.txt", b"a"), ("b.txt", b"b"), ("notes/c.txt", b"c")],
    );

    let dest = dir.path().join("out");
    unzip(&archive, &dest, &UnzipOptions::new()).unwrap();

    assert_eq!(
        tree_paths(&dest),
        [
            "bundle",
            "bundle/a.txt",
            "bundle/b.txt",
            "bundle/notes",
            "bundle/notes/c.txt"
        ]
    );
}

#[test]
fn test_traversal_entry_fails_the_whole_extraction() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("evil.zip");
    write_archive(
        &archive,
        &[
            ("ok.txt", b"fine"),
            ("../../escape.txt", b"evil"),
            ("late.txt", b"x"),
        ],
    );

    let dest = dir.path().join("sandbox").join("out");
    std::fs::create_dir_all(&dest).unwrap();
    let err = unzip(&archive, &dest, &UnzipOptions::new()).unwrap_err();

    match err {
        Error::PathTraversal { entry_index, ref path } => {
            assert_eq!(entry_index, 1);
            assert_eq!(path, "../../escape.txt");
        }
        other => panic!("expected PathTraversal, got {other:?}"),
    }
    assert!(err.is_security_error());
    assert!(!dir.path().join("sandbox/escape.txt").exists());
    assert!(!dest.join("evil/late.txt").exists());
}

#[test]
fn test_absolute_entry_name_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("abs.zip");
    write_archive(
        &archive,
        &[("/etc/evil.conf", b"x"), ("a.txt", b"fine"), ("b.txt", b"fine")],
    );

    let dest = dir.path().join("out");
    let err = unzip(&archive, &dest, &UnzipOptions::new()).unwrap_err();
    assert!(matches!(err, Error::PathTraversal { .. }));
}

#[test]
fn test_housekeeping_debris_is_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("mac.zip");
    write_archive(
        &archive,
        &[
            ("photo.jpg", b"jpeg"),
            ("__MACOSX/", b""),
            ("__MACOSX/._photo.jpg", b"resource fork"),
            (".DS_Store", b"finder"),
        ],
    );

    let dest = dir.path().join("out");
    unzip(&archive, &dest, &UnzipOptions::new()).unwrap();

    // With the debris gone this is a singleton
    assert_eq!(tree_paths(&dest), ["photo.jpg"]);
}

#[test]
fn test_corrupt_entry_reports_checksum_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("bundle.zip");
    write_archive(
        &archive,
        &[("good.txt", b"intact payload"), ("bad.txt", b"target payload")],
    );
    corrupt_payload(&archive, b"target payload");

    let dest = dir.path().join("out");
    let err = unzip(&archive, &dest, &UnzipOptions::new()).unwrap_err();

    match &err {
        Error::ChecksumMismatch {
            entry_name,
            expected,
            actual,
            ..
        } => {
            assert_eq!(entry_name.as_deref(), Some("bad.txt"));
            assert_ne!(expected, actual);
        }
        other => panic!("expected ChecksumMismatch, got {other:?}"),
    }
    assert!(err.is_corruption());
    // The mismatched bytes stay on disk for inspection
    assert!(dest.join("bundle/bad.txt").exists());
}

#[test]
fn test_skip_checksum_extracts_corrupt_entries() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("bundle.zip");
    write_archive(
        &archive,
        &[("good.txt", b"intact payload"), ("bad.txt", b"target payload")],
    );
    corrupt_payload(&archive, b"target payload");

    let dest = dir.path().join("out");
    unzip(&archive, &dest, &UnzipOptions::new().skip_checksum(true)).unwrap();

    assert!(dest.join("bundle/bad.txt").exists());
    assert_eq!(
        std::fs::read(dest.join("bundle/good.txt")).unwrap(),
        b"intact payload"
    );
}

#[test]
fn test_missing_archive_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = unzip(
        dir.path().join("nope.zip"),
        dir.path().join("out"),
        &UnzipOptions::new(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[test]
fn test_non_archive_file_is_invalid_format() {
    let dir = tempfile::tempdir().unwrap();
    let not_zip = dir.path().join("readme.txt");
    std::fs::write(&not_zip, b"just some text, no central directory").unwrap();

    let err = unzip(&not_zip, dir.path().join("out"), &UnzipOptions::new()).unwrap_err();
    assert!(matches!(err, Error::InvalidFormat(_)));
}

#[cfg(unix)]
#[test]
fn test_stored_permissions_are_restored() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("modes.zip");
    ArchiveBuilder::create(&archive)
        .file_with_mode("run.sh", b"#!/bin/sh\n", 0o755)
        .file_with_mode("secret.txt", b"quiet", 0o600)
        .finish();

    let dest = dir.path().join("out");
    unzip(&archive, &dest, &UnzipOptions::new()).unwrap();

    let mode = |name: &str| {
        std::fs::metadata(dest.join("modes").join(name))
            .unwrap()
            .permissions()
            .mode()
            & 0o7777
    };
    assert_eq!(mode("run.sh"), 0o755);
    assert_eq!(mode("secret.txt"), 0o600);
}

#[cfg(unix)]
#[test]
fn test_zeroed_permission_word_falls_back_to_defaults() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("bare.zip");
    // No unix_permissions call: the builder still stamps defaults, so
    // force a zero word explicitly.
    ArchiveBuilder::create(&archive)
        .file_with_mode("plain.txt", b"text", 0)
        .finish();

    let dest = dir.path().join("out");
    unzip(&archive, &dest, &UnzipOptions::new()).unwrap();

    let mode = std::fs::metadata(dest.join("plain.txt"))
        .unwrap()
        .permissions()
        .mode()
        & 0o7777;
    assert_eq!(mode, 0o644);
}

#[test]
fn test_stored_modification_time_is_restored() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("times.zip");
    ArchiveBuilder::create(&archive)
        .file_with_mtime("old.txt", b"from the past", (2019, 7, 20, 10, 30, 0))
        .finish();

    let dest = dir.path().join("out");
    unzip(&archive, &dest, &UnzipOptions::new()).unwrap();

    let meta = std::fs::metadata(dest.join("old.txt")).unwrap();
    let mtime = filetime::FileTime::from_last_modification_time(&meta);
    let expected = zipnest::DosDateTime::from_fields(2019, 7, 20, 10, 30, 0)
        .unwrap()
        .as_unix_secs();
    assert_eq!(mtime.unix_seconds(), expected);
}

#[cfg(unix)]
#[test]
fn test_symlink_entry_materializes_as_link() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("links.zip");
    ArchiveBuilder::create(&archive)
        .file("data.txt", b"pointed at")
        .symlink("link.txt", "data.txt")
        .finish();

    let dest = dir.path().join("out");
    unzip(&archive, &dest, &UnzipOptions::new()).unwrap();

    let link = dest.join("links/link.txt");
    assert!(link.symlink_metadata().unwrap().file_type().is_symlink());
    assert_eq!(
        std::fs::read_link(&link).unwrap().to_string_lossy(),
        "data.txt"
    );
    assert_eq!(std::fs::read(link).unwrap(), b"pointed at");
}

#[cfg(unix)]
#[test]
fn test_symlink_target_outside_destination_is_not_followed() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("links.zip");
    ArchiveBuilder::create(&archive)
        .symlink("passwd", "/etc/passwd")
        .file("note.txt", b"n")
        .finish();

    let dest = dir.path().join("out");
    unzip(&archive, &dest, &UnzipOptions::new()).unwrap();

    // The link itself is allowed; it must exist as a link, and the file
    // it points at must be untouched.
    let link = dest.join("links/passwd");
    assert!(link.symlink_metadata().unwrap().file_type().is_symlink());
    assert_eq!(
        std::fs::read_link(&link).unwrap().to_string_lossy(),
        "/etc/passwd"
    );
}

#[test]
fn test_cancelled_tree_stops_extraction() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("bundle.zip");
    write_archive(&archive, &[("a.txt", b"a"), ("b.txt", b"b")]);

    let progress = zipnest::ProgressTree::new();
    progress.cancel();
    let options = UnzipOptions::new().progress(progress);
    let err = unzip(&archive, dir.path().join("out"), &options).unwrap_err();
    assert!(matches!(err, Error::Cancelled));
}
