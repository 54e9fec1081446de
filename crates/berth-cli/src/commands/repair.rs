//! Repair command - backfill missing structure in descriptor files.

use crate::app::App;
use berth_core::{repair, Config};
use std::path::PathBuf;

/// Run the repair command.
pub fn run(config: Config, config_path: PathBuf) -> anyhow::Result<()> {
    let app = App::new(config, config_path);
    let catalog = app.scan_blocking()?;

    if catalog.is_empty() {
        println!(
            "No workspaces found under {}",
            app.config.general.root.display()
        );
        return Ok(());
    }

    let report = repair::run(&catalog);

    println!(
        "Repaired {} of {} descriptors",
        report.modified,
        catalog.len()
    );
    if report.failed > 0 {
        println!("{} descriptors could not be repaired", report.failed);
    }

    Ok(())
}
