//! Pin command - toggle a workspace on the pinned list.

use crate::app::App;
use berth_core::Config;
use std::path::PathBuf;

/// Run the pin command.
pub fn run(config: Config, config_path: PathBuf, name: &str) -> anyhow::Result<()> {
    let mut app = App::new(config, config_path);
    let catalog = app.scan_blocking()?;

    let workspace = app.resolve(&catalog, name)?.clone();
    let path = workspace.path_str().into_owned();

    app.config.toggle_pin(&path);
    app.save_config()?;

    if app.config.is_pinned(&path) {
        println!("Pinned {}", workspace.name);
    } else {
        println!("Unpinned {}", workspace.name);
    }

    Ok(())
}
