//! Application state management.

use anyhow::bail;
use berth_core::{Catalog, Config, ScanUpdate, Scanner, Workspace};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Shared application state.
pub struct App {
    /// Configuration
    pub config: Config,

    /// Where the configuration is persisted
    config_path: PathBuf,

    /// Scan coordinator
    pub scanner: Scanner,
}

impl App {
    /// Create a new application instance.
    pub fn new(config: Config, config_path: PathBuf) -> Self {
        info!(
            root = %config.general.root.display(),
            "Application initialized"
        );

        App {
            config,
            config_path,
            scanner: Scanner::new(),
        }
    }

    /// Scan the configured root and block until the snapshot publishes.
    pub fn scan_blocking(&self) -> anyhow::Result<Arc<Catalog>> {
        self.scanner.start_scan(&self.config.general.root);

        loop {
            match self.scanner.next_update(Duration::from_secs(1)) {
                Some(ScanUpdate::Completed { catalog }) => return Ok(catalog),
                Some(ScanUpdate::Failed { error, .. }) => return Err(error.into()),
                Some(ScanUpdate::Progress { count, .. }) => {
                    debug!(count = count, "Scan in progress");
                }
                None => {
                    if !self.scanner.is_scanning() {
                        bail!("scan ended without publishing a snapshot");
                    }
                }
            }
        }
    }

    /// Resolve a workspace by descriptor path or case-insensitive name.
    ///
    /// An exact path match wins outright; otherwise the name must identify
    /// exactly one catalog entry.
    pub fn resolve<'a>(&self, catalog: &'a Catalog, needle: &str) -> anyhow::Result<&'a Workspace> {
        if let Some(ws) = catalog.workspaces().iter().find(|w| w.is_at(needle)) {
            return Ok(ws);
        }

        let needle_lower = needle.to_lowercase();
        let mut matches = catalog
            .workspaces()
            .iter()
            .filter(|w| w.name_lower == needle_lower);

        match (matches.next(), matches.next()) {
            (Some(ws), None) => Ok(ws),
            (Some(first), Some(_)) => bail!(
                "workspace name '{}' is ambiguous; use a descriptor path (e.g. {})",
                needle,
                first.path.display()
            ),
            (None, _) => bail!("no workspace named '{}' in the catalog", needle),
        }
    }

    /// Persist the configuration, shortlists included.
    pub fn save_config(&self) -> anyhow::Result<()> {
        self.config.save_to(&self.config_path)?;
        Ok(())
    }

    /// Record a workspace launch on the recent list and persist it.
    pub fn record_launch(&mut self, path: &str) -> anyhow::Result<()> {
        self.config.touch_recent(path);
        self.save_config()
    }
}
