//! Command implementations for the CLI tool.

use std::path::Path;
use std::time::Duration;

use zipnest::{Compression, NameDecoding, ProgressTree, Result, UnzipOptions, ZipOptions};

use crate::exit_codes::{ExitCode, error_to_exit_code};
use crate::progress::CliProgress;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Configuration for the zip command.
pub struct ZipConfig<'a> {
    pub source: &'a Path,
    pub archive: &'a Path,
    pub keep_parent_dir: bool,
    pub compression: Compression,
    pub quiet: bool,
    pub progress: ProgressTree,
}

/// Configuration for the unzip command.
pub struct UnzipConfig<'a> {
    pub archive: &'a Path,
    pub output: &'a Path,
    pub skip_checksum: bool,
    pub decoding: NameDecoding,
    pub quiet: bool,
    pub progress: ProgressTree,
}

/// Zip command implementation
pub fn zip(config: &ZipConfig<'_>) -> ExitCode {
    let options = ZipOptions::new()
        .keep_parent_dir(config.keep_parent_dir)
        .compression(config.compression)
        .progress(config.progress.clone());

    let source = config.source.to_path_buf();
    let archive = config.archive.to_path_buf();
    run_observed(
        config.quiet,
        &config.progress,
        "Archiving...",
        &format!("Created {}", config.archive.display()),
        move || zipnest::zip(&source, &archive, &options),
    )
}

/// Unzip command implementation
pub fn unzip(config: &UnzipConfig<'_>) -> ExitCode {
    let options = UnzipOptions::new()
        .skip_checksum(config.skip_checksum)
        .decoding(config.decoding)
        .progress(config.progress.clone());

    let archive = config.archive.to_path_buf();
    let output = config.output.to_path_buf();
    run_observed(
        config.quiet,
        &config.progress,
        "Extracting...",
        &format!("Extracted to {}", config.output.display()),
        move || zipnest::unzip(&archive, &output, &options),
    )
}

/// Runs `operation` on a worker thread while the main thread polls the
/// progress tree into a bar. The Ctrl+C handler cancels through the same
/// tree.
fn run_observed(
    quiet: bool,
    progress: &ProgressTree,
    working: &str,
    done: &str,
    operation: impl FnOnce() -> Result<()> + Send + 'static,
) -> ExitCode {
    let mut bar = CliProgress::new(quiet);
    bar.set_message(working.to_string());

    let worker = std::thread::spawn(operation);
    while !worker.is_finished() {
        bar.observe(progress);
        std::thread::sleep(POLL_INTERVAL);
    }
    bar.observe(progress);

    let result = match worker.join() {
        Ok(result) => result,
        Err(_) => {
            bar.abandon();
            eprintln!("Error: worker thread panicked");
            return ExitCode::FatalError;
        }
    };

    match result {
        Ok(()) => {
            bar.finish_with_message(done.to_string());
            ExitCode::Success
        }
        Err(e) => {
            bar.abandon();
            eprintln!("Error: {e}");
            error_to_exit_code(&e)
        }
    }
}
