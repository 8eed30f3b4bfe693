//! Hierarchical, cancellable progress tracking.
//!
//! One [`ProgressTree`] spans a whole zip or unzip call. Before any work
//! starts the orchestrator pre-computes the total unit count (the sum of
//! every participating entry's size estimate) and stores it on the root;
//! each entry then gets a [`ProgressNode`] child carrying a pre-allocated
//! share of that total. Advancing a child advances the root by exactly the
//! forwarded amount, so the root's fraction moves proportionally to the
//! entry sizes and never exceeds 1.0 however the per-entry loops report.
//!
//! Cancellation is a single cooperative flag on the shared core. Any clone
//! of the tree can set it from any thread; the byte-transfer loops check it
//! once per buffer chunk and abort the in-flight entry with
//! [`Error::Cancelled`](crate::Error::Cancelled) as soon as they observe
//! it. Bytes already written for that entry stay on disk; cancellation
//! does not roll anything back.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use zipnest::{unzip, ProgressTree, UnzipOptions};
//!
//! let progress = ProgressTree::new();
//! let observer = progress.clone();
//!
//! let worker = std::thread::spawn(move || {
//!     let options = UnzipOptions::new().progress(progress);
//!     unzip(Path::new("bundle.zip"), Path::new("out"), &options)
//! });
//!
//! while !worker.is_finished() {
//!     println!("{:.0}%", observer.fraction() * 100.0);
//!     std::thread::sleep(std::time::Duration::from_millis(100));
//! }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::error::{Error, Result};

/// Shared atomic core behind every handle of one tree.
#[derive(Debug, Default)]
struct Core {
    total_units: AtomicU64,
    completed_units: AtomicU64,
    cancelled: AtomicBool,
}

/// The root tracker for one zip or unzip call.
///
/// Cheaply cloneable; all clones observe the same counters and the same
/// cancellation flag. The orchestrator sets the total once before work
/// starts and attaches one [`ProgressNode`] child per entry.
#[derive(Debug, Clone, Default)]
pub struct ProgressTree {
    core: Arc<Core>,
}

impl ProgressTree {
    /// Creates a tree with zero total units and no cancellation requested.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pre-computed total unit count.
    ///
    /// Called once by the orchestrator after summing per-entry estimates,
    /// before the first entry is processed.
    pub(crate) fn set_total(&self, total: u64) {
        self.core.total_units.store(total, Ordering::Relaxed);
    }

    /// Total units of work across the whole operation.
    ///
    /// Zero until the orchestrator has enumerated the entries.
    pub fn total_units(&self) -> u64 {
        self.core.total_units.load(Ordering::Relaxed)
    }

    /// Units completed so far. Monotonically increasing.
    pub fn completed_units(&self) -> u64 {
        self.core.completed_units.load(Ordering::Relaxed)
    }

    /// Fractional completion in `0.0..=1.0`.
    ///
    /// Zero while the total is unknown.
    pub fn fraction(&self) -> f64 {
        let total = self.total_units();
        if total == 0 {
            0.0
        } else {
            (self.completed_units().min(total)) as f64 / total as f64
        }
    }

    /// Requests cooperative cancellation.
    ///
    /// The in-flight transfer loop observes the flag at buffer-chunk
    /// granularity; the request takes effect once the current chunk
    /// completes.
    pub fn cancel(&self) {
        self.core.cancelled.store(true, Ordering::Relaxed);
    }

    /// Returns whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.core.cancelled.load(Ordering::Relaxed)
    }

    /// Attaches a child tracker holding `share` units of this tree's total.
    ///
    /// Completing the child advances the root by exactly `share`; a child
    /// that over-reports is clamped to its allocation.
    pub(crate) fn child(&self, share: u64) -> ProgressNode {
        ProgressNode {
            core: Arc::clone(&self.core),
            share,
            forwarded: 0,
        }
    }
}

/// A per-entry child tracker with a pre-allocated share of the root total.
///
/// Not cloneable: exactly one node owns each entry's share, which is what
/// keeps the root's completed count from double-advancing.
#[derive(Debug)]
pub struct ProgressNode {
    core: Arc<Core>,
    share: u64,
    forwarded: u64,
}

impl ProgressNode {
    /// A detached node for callers that did not request progress.
    ///
    /// Advancing it goes nowhere and it never reports cancellation, so
    /// transfer loops can take a node unconditionally.
    pub(crate) fn detached() -> Self {
        Self {
            core: Arc::new(Core::default()),
            share: 0,
            forwarded: 0,
        }
    }

    /// The share of the root total allocated to this entry.
    pub fn share(&self) -> u64 {
        self.share
    }

    /// Advances this node by `units`, clamped to the remaining share.
    ///
    /// The clamped amount is forwarded to the root immediately, so
    /// observers see byte-level motion inside large entries rather than
    /// one jump per entry.
    pub fn advance(&mut self, units: u64) {
        let forwarded = units.min(self.share - self.forwarded);
        if forwarded > 0 {
            self.forwarded += forwarded;
            self.core
                .completed_units
                .fetch_add(forwarded, Ordering::Relaxed);
        }
    }

    /// Marks the entry finished, forwarding whatever share remains.
    ///
    /// Keeps the root exact when an entry's actual byte count undershoots
    /// its estimate (directories, short symlink targets).
    pub fn complete(&mut self) {
        let remainder = self.share - self.forwarded;
        self.advance(remainder);
    }

    /// Returns [`Error::Cancelled`] if cancellation has been requested.
    ///
    /// Transfer loops call this once per buffer chunk; that bounded
    /// granularity is the cancellation latency the contract promises.
    pub fn check_cancelled(&self) -> Result<()> {
        if self.core.cancelled.load(Ordering::Relaxed) {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}
