//! Shared test utilities for integration tests.
//!
//! Archives are crafted directly with the container engine so tests can
//! produce layouts (traversal names, housekeeping debris, bare modes)
//! that the public creation API would never emit.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test
//! file compiles as a separate crate and may only use a subset of these
//! helpers.

#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::Path;

use zip::write::SimpleFileOptions;

/// Fluent builder for hand-crafted test archives.
pub struct ArchiveBuilder {
    writer: zip::ZipWriter<File>,
}

impl ArchiveBuilder {
    pub fn create(path: &Path) -> Self {
        let file = File::create(path).expect("create test archive");
        Self {
            writer: zip::ZipWriter::new(file),
        }
    }

    fn options() -> SimpleFileOptions {
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored)
    }

    /// Adds a file entry with the given content.
    pub fn file(mut self, name: &str, content: &[u8]) -> Self {
        self.writer
            .start_file(name, Self::options())
            .expect("start file");
        self.writer.write_all(content).expect("write content");
        self
    }

    /// Adds a file entry carrying explicit Unix permissions.
    pub fn file_with_mode(mut self, name: &str, content: &[u8], mode: u32) -> Self {
        self.writer
            .start_file(name, Self::options().unix_permissions(mode))
            .expect("start file");
        self.writer.write_all(content).expect("write content");
        self
    }

    /// Adds a file entry with an explicit modification time.
    pub fn file_with_mtime(
        mut self,
        name: &str,
        content: &[u8],
        (year, month, day, hour, minute, second): (u16, u8, u8, u8, u8, u8),
    ) -> Self {
        let dt = zip::DateTime::from_date_and_time(year, month, day, hour, minute, second)
            .expect("valid datetime");
        self.writer
            .start_file(name, Self::options().last_modified_time(dt))
            .expect("start file");
        self.writer.write_all(content).expect("write content");
        self
    }

    /// Adds a directory entry (name should end with `/`).
    pub fn dir(mut self, name: &str) -> Self {
        self.writer
            .add_directory(name.trim_end_matches('/'), Self::options())
            .expect("add directory");
        self
    }

    /// Adds a symlink entry pointing at `target`.
    pub fn symlink(mut self, name: &str, target: &str) -> Self {
        self.writer
            .add_symlink(name, target, Self::options().unix_permissions(0o777))
            .expect("add symlink");
        self
    }

    pub fn finish(mut self) {
        self.writer.finish().expect("finish archive");
    }
}

/// Writes a stored-compression archive of plain file entries.
///
/// Names ending in `/` become directory entries.
pub fn write_archive(path: &Path, entries: &[(&str, &[u8])]) {
    let mut builder = ArchiveBuilder::create(path);
    for (name, content) in entries {
        builder = if name.ends_with('/') {
            builder.dir(name)
        } else {
            builder.file(name, content)
        };
    }
    builder.finish();
}

/// Flips one byte of `payload` inside the archive file at `path`.
///
/// Entries are stored uncompressed, so the payload appears verbatim in
/// the container and corrupting it breaks the entry's CRC without
/// touching any header.
pub fn corrupt_payload(path: &Path, payload: &[u8]) {
    let mut bytes = std::fs::read(path).expect("read archive");
    let at = bytes
        .windows(payload.len())
        .position(|w| w == payload)
        .expect("payload present in archive");
    bytes[at] ^= 0xFF;
    std::fs::write(path, bytes).expect("write corrupted archive");
}

/// Lists the entry names of an archive, in container order.
pub fn entry_names(path: &Path) -> Vec<String> {
    let file = File::open(path).expect("open archive");
    let mut archive = zip::ZipArchive::new(file).expect("parse archive");
    (0..archive.len())
        .map(|i| archive.by_index(i).expect("entry").name().to_string())
        .collect()
}

/// Reads one entry's decompressed content.
pub fn entry_content(path: &Path, name: &str) -> Vec<u8> {
    use std::io::Read;
    let file = File::open(path).expect("open archive");
    let mut archive = zip::ZipArchive::new(file).expect("parse archive");
    let mut entry = archive.by_name(name).expect("entry by name");
    let mut content = Vec::new();
    entry.read_to_end(&mut content).expect("read entry");
    content
}

/// Collects the relative paths of everything under `root`, sorted.
pub fn tree_paths(root: &Path) -> Vec<String> {
    let mut paths: Vec<String> = walkdir::WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.depth() > 0)
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    paths.sort();
    paths
}
