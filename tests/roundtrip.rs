//! Whole-cycle tests: zip a tree, unzip it elsewhere, compare.

mod common;

use common::tree_paths;
use rand::{Rng, SeedableRng, rngs::StdRng};
use zipnest::{Compression, UnzipOptions, ZipOptions, unzip, zip};

fn random_payload(rng: &mut StdRng, len: usize) -> Vec<u8> {
    (0..len).map(|_| rng.r#gen()).collect()
}

#[test]
fn test_tree_round_trips_bytes_and_layout() {
    let dir = tempfile::tempdir().unwrap();
    let mut rng = StdRng::seed_from_u64(0x5eed);

    let source = dir.path().join("data");
    std::fs::create_dir_all(source.join("nested/deep")).unwrap();
    let payloads = [
        ("top.bin", random_payload(&mut rng, 10_000)),
        ("nested/mid.bin", random_payload(&mut rng, 100)),
        ("nested/deep/leaf.bin", random_payload(&mut rng, 70_000)),
        ("nested/empty.bin", Vec::new()),
    ];
    for (name, payload) in &payloads {
        std::fs::write(source.join(name), payload).unwrap();
    }

    let archive = dir.path().join("data.zip");
    zip(&source, &archive, &ZipOptions::new()).unwrap();

    let dest = dir.path().join("restored");
    unzip(&archive, &dest, &UnzipOptions::new()).unwrap();

    // Wrapped shape: the tree reappears under its own name
    for (name, payload) in &payloads {
        assert_eq!(&std::fs::read(dest.join("data").join(name)).unwrap(), payload);
    }
    assert_eq!(
        tree_paths(&dest),
        [
            "data",
            "data/nested",
            "data/nested/deep",
            "data/nested/deep/leaf.bin",
            "data/nested/empty.bin",
            "data/nested/mid.bin",
            "data/top.bin",
        ]
    );
}

#[test]
fn test_deflated_round_trip_matches_stored() {
    let dir = tempfile::tempdir().unwrap();
    let mut rng = StdRng::seed_from_u64(7);

    let source = dir.path().join("blob");
    std::fs::create_dir(&source).unwrap();
    let mut payload = random_payload(&mut rng, 5_000);
    payload.extend(std::iter::repeat(0x42).take(50_000));
    std::fs::write(source.join("mixed.bin"), &payload).unwrap();

    let archive = dir.path().join("blob.zip");
    let options = ZipOptions::new().compression(Compression::Deflated);
    zip(&source, &archive, &options).unwrap();

    let dest = dir.path().join("out");
    unzip(&archive, &dest, &UnzipOptions::new()).unwrap();
    assert_eq!(std::fs::read(dest.join("blob/mixed.bin")).unwrap(), payload);
}

#[cfg(unix)]
#[test]
fn test_permissions_survive_the_round_trip() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("proj");
    std::fs::create_dir(&source).unwrap();
    std::fs::write(source.join("run.sh"), b"#!/bin/sh\nexit 0\n").unwrap();
    std::fs::set_permissions(source.join("run.sh"), std::fs::Permissions::from_mode(0o755))
        .unwrap();
    std::fs::write(source.join("data.txt"), b"plain").unwrap();
    std::fs::set_permissions(
        source.join("data.txt"),
        std::fs::Permissions::from_mode(0o600),
    )
    .unwrap();

    let archive = dir.path().join("proj.zip");
    zip(&source, &archive, &ZipOptions::new()).unwrap();
    let dest = dir.path().join("out");
    unzip(&archive, &dest, &UnzipOptions::new()).unwrap();

    let mode = |name: &str| {
        std::fs::metadata(dest.join("proj").join(name))
            .unwrap()
            .permissions()
            .mode()
            & 0o7777
    };
    assert_eq!(mode("run.sh"), 0o755);
    assert_eq!(mode("data.txt"), 0o600);
}

#[test]
fn test_modification_times_survive_within_dos_resolution() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("proj");
    std::fs::create_dir(&source).unwrap();
    std::fs::write(source.join("old.txt"), b"aged").unwrap();

    // 2021-03-04 05:06:08 UTC, an even second to sidestep rounding
    let stamp = filetime::FileTime::from_unix_time(1_614_834_368, 0);
    filetime::set_file_mtime(source.join("old.txt"), stamp).unwrap();

    let archive = dir.path().join("proj.zip");
    zip(&source, &archive, &ZipOptions::new()).unwrap();
    let dest = dir.path().join("out");
    unzip(&archive, &dest, &UnzipOptions::new()).unwrap();

    let meta = std::fs::metadata(dest.join("proj/old.txt")).unwrap();
    let restored = filetime::FileTime::from_last_modification_time(&meta);
    // DOS timestamps have two-second resolution
    assert!((restored.unix_seconds() - stamp.unix_seconds()).abs() <= 2);
}

#[cfg(unix)]
#[test]
fn test_symlinks_survive_the_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("proj");
    std::fs::create_dir(&source).unwrap();
    std::fs::write(source.join("real.txt"), b"content").unwrap();
    std::os::unix::fs::symlink("real.txt", source.join("link.txt")).unwrap();

    let archive = dir.path().join("proj.zip");
    zip(&source, &archive, &ZipOptions::new()).unwrap();
    let dest = dir.path().join("out");
    unzip(&archive, &dest, &UnzipOptions::new()).unwrap();

    let link = dest.join("proj/link.txt");
    assert!(link.symlink_metadata().unwrap().file_type().is_symlink());
    assert_eq!(
        std::fs::read_link(&link).unwrap().to_string_lossy(),
        "real.txt"
    );
}

#[test]
fn test_flat_creation_then_extraction_gathers_under_stem() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("stuff");
    std::fs::create_dir(&source).unwrap();
    std::fs::write(source.join("a.txt"), b"a").unwrap();
    std::fs::write(source.join("b.txt"), b"b").unwrap();

    let archive = dir.path().join("stuff.zip");
    let options = ZipOptions::new().keep_parent_dir(false);
    zip(&source, &archive, &options).unwrap();

    let dest = dir.path().join("out");
    unzip(&archive, &dest, &UnzipOptions::new()).unwrap();

    // Dropping the wrapper makes a flat archive, which extraction
    // re-gathers under the archive's stem.
    assert_eq!(tree_paths(&dest), ["stuff", "stuff/a.txt", "stuff/b.txt"]);
}

#[test]
fn test_progress_reaches_completion_both_ways() {
    let dir = tempfile::tempdir().unwrap();
    let mut rng = StdRng::seed_from_u64(99);
    let source = dir.path().join("proj");
    std::fs::create_dir(&source).unwrap();
    std::fs::write(source.join("big.bin"), random_payload(&mut rng, 200_000)).unwrap();

    let archive = dir.path().join("proj.zip");
    let zipping = zipnest::ProgressTree::new();
    zip(
        &source,
        &archive,
        &ZipOptions::new().progress(zipping.clone()),
    )
    .unwrap();
    assert!((zipping.fraction() - 1.0).abs() < 1e-9);

    let dest = dir.path().join("out");
    let unzipping = zipnest::ProgressTree::new();
    unzip(
        &archive,
        &dest,
        &UnzipOptions::new().progress(unzipping.clone()),
    )
    .unwrap();
    assert!((unzipping.fraction() - 1.0).abs() < 1e-9);
}
