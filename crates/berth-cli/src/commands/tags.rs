//! Tags command - list every tag present in the catalog.

use crate::app::App;
use berth_core::Config;
use std::path::PathBuf;

/// Run the tags command.
pub fn run(config: Config, config_path: PathBuf) -> anyhow::Result<()> {
    let app = App::new(config, config_path);
    let catalog = app.scan_blocking()?;

    if catalog.tags().is_empty() {
        println!("No tags in the catalog");
        return Ok(());
    }

    for tag in catalog.tags() {
        let count = catalog
            .workspaces()
            .iter()
            .filter(|w| w.has_tag(tag))
            .count();
        println!("{} ({})", tag, count);
    }

    Ok(())
}
