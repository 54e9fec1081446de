//! New command - create a workspace descriptor under the root.

use crate::app::App;
use crate::editor;
use anyhow::bail;
use berth_core::{descriptor, Config};
use std::fs;
use std::path::PathBuf;

/// Run the new command.
///
/// Creates `<root>/<name>/<name>.code-workspace` from the starter template.
/// Refuses to touch a directory that already exists under the root; it may
/// belong to an unrelated project.
pub fn run(
    config: Config,
    config_path: PathBuf,
    name: &str,
    description: &str,
    tags: Vec<String>,
    open: bool,
) -> anyhow::Result<()> {
    if name.is_empty() || name.contains(std::path::is_separator) {
        bail!("workspace name must be a plain directory name");
    }

    let mut app = App::new(config, config_path);

    let workspace_dir = app.config.general.root.join(name);
    let descriptor_path = workspace_dir.join(format!("{}{}", name, descriptor::EXTENSION));

    if workspace_dir.exists() {
        bail!("directory already exists: {}", workspace_dir.display());
    }

    fs::create_dir_all(&workspace_dir)?;
    descriptor::write(&descriptor_path, &descriptor::template(description, &tags))?;

    println!("Created {}", descriptor_path.display());

    if open {
        let binary = editor::resolve(app.config.general.editor.as_deref())?;
        editor::launch(&binary, &descriptor_path)?;
        app.record_launch(&descriptor_path.to_string_lossy())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_config(root: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.general.root = root.to_path_buf();
        config
    }

    #[test]
    fn test_new_creates_descriptor() {
        let dir = TempDir::new().unwrap();
        let config = make_config(dir.path());

        run(
            config,
            dir.path().join("berth.toml"),
            "fresh",
            "A demo",
            vec!["rust".to_string()],
            false,
        )
        .unwrap();

        let ws = descriptor::read(&dir.path().join("fresh").join("fresh.code-workspace")).unwrap();
        assert_eq!(ws.name, "fresh");
        assert_eq!(ws.description, "A demo");
        assert_eq!(ws.tags, vec!["rust"]);
    }

    #[test]
    fn test_new_refuses_existing_directory() {
        let dir = TempDir::new().unwrap();
        let config = make_config(dir.path());
        let taken = dir.path().join("already-here");
        fs::create_dir(&taken).unwrap();
        fs::write(taken.join("notes.txt"), "unrelated project").unwrap();

        let err = run(
            config,
            dir.path().join("berth.toml"),
            "already-here",
            "",
            Vec::new(),
            false,
        )
        .unwrap_err();

        assert!(err.to_string().contains("already exists"));
        // The directory is left exactly as it was found.
        assert!(!taken.join("already-here.code-workspace").exists());
        assert!(taken.join("notes.txt").exists());
    }

    #[test]
    fn test_new_rejects_separator_in_name() {
        let dir = TempDir::new().unwrap();
        let config = make_config(dir.path());

        let result = run(
            config,
            dir.path().join("berth.toml"),
            "nested/name",
            "",
            Vec::new(),
            false,
        );
        assert!(result.is_err());
    }
}
