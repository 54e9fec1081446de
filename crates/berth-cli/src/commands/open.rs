//! Open command - launch a workspace in the editor.

use crate::app::App;
use crate::editor;
use berth_core::Config;
use std::path::PathBuf;

/// Run the open command.
pub fn run(config: Config, config_path: PathBuf, name: &str) -> anyhow::Result<()> {
    let mut app = App::new(config, config_path);
    let catalog = app.scan_blocking()?;

    let workspace = app.resolve(&catalog, name)?.clone();

    let binary = editor::resolve(app.config.general.editor.as_deref())?;
    editor::launch(&binary, &workspace.path)?;
    app.record_launch(&workspace.path_str())?;

    println!("Opened {} ({})", workspace.name, workspace.path.display());
    Ok(())
}
