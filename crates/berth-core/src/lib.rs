//! # Berth Core Library
//!
//! This crate provides the scan, catalog, and filter functionality for the
//! Berth workspace launcher. It walks a directory tree for `.code-workspace`
//! descriptor files, publishes immutable catalog snapshots, and answers
//! filter queries against the latest snapshot while a rescan may still be
//! running in the background.
//!
//! ## Architecture
//!
//! - **Types** (`types`): Workspace entries and the immutable catalog snapshot
//! - **Descriptor** (`descriptor`): Reading, templating, and backfilling descriptor files
//! - **Walker** (`walker`): Cancellable directory traversal with pruning
//! - **Scanner** (`scanner`): Generation-gated scan coordination and snapshot publication
//! - **Filter** (`filter`): Pure text/scope/tag filtering over snapshots
//! - **Shortlist** (`shortlist`): Pinned and recently-used membership lists
//! - **Repair** (`repair`): Structural backfill pass over cataloged files
//! - **Config** (`config`): Configuration and shortlist persistence
//!
//! ## Example
//!
//! ```rust,ignore
//! use berth_core::{Filter, Scanner};
//! use std::time::Duration;
//!
//! let scanner = Scanner::new();
//! scanner.start_scan("/home/me/projects".as_ref());
//!
//! // Query the latest published snapshot at any time
//! let catalog = scanner.catalog();
//! let filter = Filter::new().with_text("api");
//! for ws in berth_core::filter::apply(&catalog, &filter, &[], &[]) {
//!     println!("{}", ws.path.display());
//! }
//! ```

pub mod config;
pub mod descriptor;
pub mod error;
pub mod filter;
pub mod repair;
pub mod scanner;
pub mod shortlist;
pub mod types;
pub mod walker;

// Re-export commonly used types
pub use config::Config;
pub use error::{BerthError, Result};
pub use filter::{Filter, Scope};
pub use repair::RepairReport;
pub use scanner::{ScanUpdate, Scanner};
pub use types::{Catalog, Workspace};
pub use walker::WalkOutcome;
