//! # zipnest
//!
//! Safe, shape-aware zip extraction and creation.
//!
//! This crate is the layer between "a zip file" and "files the user
//! actually wants": it classifies an archive's internal layout and adapts
//! the extraction to it, contains every entry inside the destination,
//! renames instead of overwriting, restores permissions and modification
//! times, and cleans up after itself when the disk fills mid-way.
//!
//! ## Quick Start
//!
//! ### Extracting an Archive
//!
//! ```rust,no_run
//! use zipnest::{Result, UnzipOptions, unzip};
//!
//! fn main() -> Result<()> {
//!     unzip("bundle.zip", "./output", &UnzipOptions::new())?;
//!     Ok(())
//! }
//! ```
//!
//! ### Creating an Archive
//!
//! ```rust,no_run
//! use zipnest::{Compression, Result, ZipOptions, zip};
//!
//! fn main() -> Result<()> {
//!     let options = ZipOptions::new().compression(Compression::Deflated);
//!     zip("./notes", "notes.zip", &options)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Shape-Aware Extraction
//!
//! Extraction looks at the archive's layout before touching the disk:
//!
//! - a **singleton** (one entry) lands directly in the destination,
//!   renamed `name 2.ext`, `name 3.ext`, ... if the name is taken;
//! - a **wrapped** archive (everything under one top-level folder) keeps
//!   that folder as its own top level, conflict-renamed once;
//! - a **flat** archive (loose top-level entries) is gathered under a
//!   fresh directory named after the archive file.
//!
//! macOS resource-fork debris (`__MACOSX/`, `.DS_Store`) is filtered out
//! before classification and never extracted.
//!
//! ## Progress and Cancellation
//!
//! Both directions accept a [`ProgressTree`]; keep a clone to poll the
//! completed fraction or cancel from another thread:
//!
//! ```rust,no_run
//! use zipnest::{ProgressTree, UnzipOptions, unzip};
//!
//! let progress = ProgressTree::new();
//! let options = UnzipOptions::new().progress(progress.clone());
//! let worker = std::thread::spawn(move || unzip("big.zip", "./out", &options));
//! while !worker.is_finished() {
//!     println!("{:3.0}%", progress.fraction() * 100.0);
//!     std::thread::sleep(std::time::Duration::from_millis(200));
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T>`], an alias for
//! `std::result::Result<T, Error>`:
//!
//! ```rust,no_run
//! use zipnest::{Error, UnzipOptions, unzip};
//!
//! match unzip("bundle.zip", "./output", &UnzipOptions::new()) {
//!     Ok(()) => println!("done"),
//!     Err(Error::PathTraversal { entry_index, path }) => {
//!         eprintln!("malicious entry {entry_index}: {path}");
//!     }
//!     Err(Error::DiskExhausted { .. }) => {
//!         eprintln!("out of space; partial output was removed");
//!     }
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```
//!
//! ## Safety
//!
//! - **Path containment**: every entry's resolved destination is checked
//!   against the extraction root before any bytes are written; traversal
//!   aborts the whole operation.
//! - **Symlinks are never traversed**: link entries are materialized as
//!   links, their targets are not followed, and their attributes are
//!   restored with non-following calls only.
//! - **CRC-32 verification**: extracted content is checked against the
//!   stored checksum unless explicitly skipped.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli` | No | The `zipnest` command-line tool |
//!
//! ## Platform Support
//!
//! | Platform | Status |
//! |----------|--------|
//! | Linux (x86_64, aarch64) | Full support |
//! | macOS (x86_64, aarch64) | Full support, including symlink permissions |
//! | Windows (x86_64) | Full support; Unix permissions not applied |
//!
//! ## Minimum Supported Rust Version (MSRV)
//!
//! This crate requires **Rust 1.85** or later.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]

/// Default buffer size for transfer loops (8 KiB). Cancellation is
/// checked once per buffer.
pub(crate) const READ_BUFFER_SIZE: usize = 8192;

pub mod attrs;
pub mod encoding;
pub mod entry;
pub mod error;
pub mod progress;
pub mod read;
pub mod safety;
pub mod shape;
pub mod timestamp;
pub mod write;

mod backend;
mod conflict;
mod container;
mod filter;

pub use error::{Error, MissingAttribute, Result};

pub use encoding::NameDecoding;
pub use entry::{Entry, EntryKind};
pub use shape::ArchiveShape;
pub use timestamp::DosDateTime;

pub use progress::{ProgressNode, ProgressTree};

pub use container::Compression;

// Re-export the two operations at crate root for convenience
pub use read::{UnzipOptions, unzip};
pub use write::{ZipOptions, zip};

pub use safety::is_contained;
