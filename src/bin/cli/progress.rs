//! Progress bar implementation for CLI operations.

use indicatif::{ProgressBar, ProgressStyle};
use zipnest::ProgressTree;

/// Progress display driven by polling a [`ProgressTree`].
///
/// The tree's total is only known once the worker has enumerated its
/// work, so the bar starts as a spinner and switches to a bar on the
/// first observation with a non-zero total.
pub struct CliProgress {
    bar: ProgressBar,
    sized: bool,
}

impl CliProgress {
    /// Creates a new progress display
    pub fn new(quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg}")
                    .unwrap(),
            );
            pb.enable_steady_tick(std::time::Duration::from_millis(100));
            pb
        };
        Self { bar, sized: false }
    }

    /// Sets the message shown next to the bar
    pub fn set_message(&self, msg: impl Into<String>) {
        self.bar.set_message(msg.into());
    }

    /// Reflects the tree's current state on the bar
    pub fn observe(&mut self, tree: &ProgressTree) {
        let total = tree.total_units();
        if total == 0 {
            return;
        }
        if !self.sized {
            self.sized = true;
            self.bar.disable_steady_tick();
            self.bar.set_length(total);
            self.bar.set_style(
                ProgressStyle::default_bar()
                    .template(
                        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta}) {msg}",
                    )
                    .unwrap()
                    .progress_chars("#>-"),
            );
        }
        self.bar.set_position(tree.completed_units());
    }

    /// Finishes with a message
    pub fn finish_with_message(&self, msg: impl Into<String>) {
        self.bar.finish_with_message(msg.into());
    }

    /// Abandons the bar, leaving it at its last position
    pub fn abandon(&self) {
        self.bar.abandon();
    }
}
