//! Scan coordination: background walks, generations, and snapshot publication.
//!
//! The `Scanner` owns the lifecycle of catalog scans:
//!
//! - Each `start_scan` bumps a generation counter, asks the previous walk to
//!   stop (best-effort, never awaited), and spawns a fresh worker thread.
//! - Workers report progress, completion, or failure over a channel, tagged
//!   with the generation they were started under.
//! - The coordinator drains reports on the caller's thread (`poll` /
//!   `next_update`) and applies the generation gate: only reports carrying
//!   the current generation take effect, everything else is discarded.
//!
//! ## Publication
//!
//! The published [`Catalog`] lives behind an `RwLock<Arc<Catalog>>`; a
//! completed scan swaps the pointer in one motion. Readers clone the `Arc`
//! and keep filtering against their snapshot even while the next scan runs.
//! A superseded walk that slips past its last cancellation check can still
//! finish, but its result is dropped at the gate, so the snapshot can only
//! ever advance to the newest requested scan. The swap re-checks under the
//! write lock, keeping publication monotone even when several threads drain
//! updates at once.

use crate::error::BerthError;
use crate::types::{Catalog, Workspace};
use crate::walker::{self, WalkOutcome};
use crossbeam_channel::{Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Observable scan events, already filtered through the generation gate.
#[derive(Debug)]
pub enum ScanUpdate {
    /// The in-flight walk has accepted `count` entries so far.
    Progress { generation: u64, count: usize },

    /// A scan finished and its snapshot is now published.
    Completed { catalog: Arc<Catalog> },

    /// The in-flight walk failed; the previous snapshot stays published.
    Failed { generation: u64, error: BerthError },
}

/// Raw reports sent by worker threads, before the generation gate.
enum WorkerReport {
    Progress {
        generation: u64,
        count: usize,
    },
    Finished {
        generation: u64,
        workspaces: Vec<Workspace>,
    },
    Failed {
        generation: u64,
        error: BerthError,
    },
}

/// Coordinates background scans and owns the published snapshot.
pub struct Scanner {
    /// Highest generation issued so far; 0 means no scan was ever requested
    generation: AtomicU64,

    /// Whether the current generation's walk is still running
    scanning: AtomicBool,

    /// The published snapshot, swapped wholesale on completion
    catalog: RwLock<Arc<Catalog>>,

    /// Cancellation token of the in-flight walk, replaced on every start
    cancel: Mutex<Option<Arc<AtomicBool>>>,

    /// Worker report channel (the sender side is cloned into workers)
    report_tx: Sender<WorkerReport>,
    report_rx: Receiver<WorkerReport>,
}

impl Scanner {
    /// Create a scanner with an empty published catalog.
    pub fn new() -> Self {
        let (report_tx, report_rx) = crossbeam_channel::unbounded();
        Scanner {
            generation: AtomicU64::new(0),
            scanning: AtomicBool::new(false),
            catalog: RwLock::new(Arc::new(Catalog::empty())),
            cancel: Mutex::new(None),
            report_tx,
            report_rx,
        }
    }

    /// The latest published snapshot.
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog.read())
    }

    /// Highest generation issued so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Whether a walk for the current generation is still in flight.
    pub fn is_scanning(&self) -> bool {
        self.scanning.load(Ordering::Acquire)
    }

    /// Start a scan of `root`, superseding any walk already in flight.
    ///
    /// The previous walk is asked to stop cooperatively but never joined;
    /// this call returns the new generation id immediately. Whatever the
    /// superseded walk still produces is discarded by the generation gate.
    pub fn start_scan(&self, root: &Path) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;

        let cancel = Arc::new(AtomicBool::new(false));
        if let Some(superseded) = self.cancel.lock().replace(Arc::clone(&cancel)) {
            superseded.store(true, Ordering::Relaxed);
        }

        self.scanning.store(true, Ordering::Release);
        info!(root = %root.display(), generation = generation, "Starting scan");

        let tx = self.report_tx.clone();
        let root = root.to_path_buf();
        thread::spawn(move || {
            let progress_tx = tx.clone();
            let outcome = walker::walk(&root, &cancel, |count| {
                let _ = progress_tx.send(WorkerReport::Progress { generation, count });
            });

            let report = match outcome {
                Ok(WalkOutcome::Completed(workspaces)) => WorkerReport::Finished {
                    generation,
                    workspaces,
                },
                // A cancelled walk contributes nothing.
                Ok(WalkOutcome::Cancelled) => return,
                Err(error) => WorkerReport::Failed { generation, error },
            };
            let _ = tx.send(report);
        });

        generation
    }

    /// Drain all pending worker reports without blocking.
    ///
    /// Returns the updates that survived the generation gate, oldest first.
    pub fn poll(&self) -> Vec<ScanUpdate> {
        let mut updates = Vec::new();
        while let Ok(report) = self.report_rx.try_recv() {
            if let Some(update) = self.accept(report) {
                updates.push(update);
            }
        }
        updates
    }

    /// Block up to `timeout` for the next update that survives the gate.
    pub fn next_update(&self, timeout: Duration) -> Option<ScanUpdate> {
        loop {
            match self.report_rx.recv_timeout(timeout) {
                Ok(report) => {
                    if let Some(update) = self.accept(report) {
                        return Some(update);
                    }
                    // Stale report; keep waiting for a current one.
                }
                Err(_) => return None,
            }
        }
    }

    /// The generation gate: apply a worker report if it is current,
    /// discard it otherwise.
    fn accept(&self, report: WorkerReport) -> Option<ScanUpdate> {
        let current = self.generation.load(Ordering::Acquire);

        match report {
            WorkerReport::Progress { generation, count } => {
                if generation != current {
                    return None;
                }
                Some(ScanUpdate::Progress { generation, count })
            }
            WorkerReport::Finished {
                generation,
                workspaces,
            } => {
                if generation != current {
                    debug!(
                        generation = generation,
                        current = current,
                        "Discarding stale scan result"
                    );
                    return None;
                }

                let catalog = Arc::new(Catalog::build(generation, workspaces));
                if !self.publish(&catalog) {
                    debug!(
                        generation = generation,
                        "Discarding scan result that lost the publication race"
                    );
                    return None;
                }
                self.scanning.store(false, Ordering::Release);

                info!(
                    generation = generation,
                    workspaces = catalog.len(),
                    "Published catalog snapshot"
                );
                Some(ScanUpdate::Completed { catalog })
            }
            WorkerReport::Failed { generation, error } => {
                if generation != current {
                    debug!(generation = generation, "Discarding stale scan failure");
                    return None;
                }

                self.scanning.store(false, Ordering::Release);
                warn!(generation = generation, error = %error, "Scan failed");
                Some(ScanUpdate::Failed { generation, error })
            }
        }
    }

    /// Swap in a completed snapshot, or refuse it if a newer one is already
    /// published. The gate runs before the write lock is taken, so the swap
    /// itself must not let publication go backwards.
    fn publish(&self, catalog: &Arc<Catalog>) -> bool {
        let mut published = self.catalog.write();
        if catalog.generation() < published.generation() {
            return false;
        }
        *published = Arc::clone(catalog);
        true
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Scanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner")
            .field("generation", &self.generation())
            .field("scanning", &self.is_scanning())
            .field("published", &self.catalog().len())
            .finish()
    }
}
