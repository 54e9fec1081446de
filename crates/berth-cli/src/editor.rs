//! Locating and launching the editor.
//!
//! Resolution order mirrors what users expect from older launcher tooling:
//! an explicit configured binary wins, then the usual names on `PATH`, then
//! a handful of well-known install locations.

use anyhow::bail;
use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Binary names tried on PATH, in preference order.
const PATH_CANDIDATES: [&str; 2] = ["code", "code-insiders"];

/// Resolve the editor binary used to open descriptors.
pub fn resolve(configured: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(editor) = configured {
        if editor.is_file() {
            return Ok(editor.to_path_buf());
        }
        bail!("configured editor not found: {}", editor.display());
    }

    for candidate in PATH_CANDIDATES {
        if let Some(found) = find_on_path(candidate) {
            debug!(editor = %found.display(), "Found editor on PATH");
            return Ok(found);
        }
    }

    for location in known_locations() {
        if location.is_file() {
            debug!(editor = %location.display(), "Found editor at known location");
            return Ok(location);
        }
    }

    bail!("no editor found; set `editor` in the configuration")
}

fn find_on_path(binary: &str) -> Option<PathBuf> {
    let path_var = env::var_os("PATH")?;

    for dir in env::split_paths(&path_var) {
        let candidate = dir.join(binary);
        if candidate.is_file() {
            return Some(candidate);
        }

        // Windows installs expose a .cmd shim rather than a bare binary.
        #[cfg(windows)]
        {
            let shim = dir.join(format!("{}.cmd", binary));
            if shim.is_file() {
                return Some(shim);
            }
        }
    }

    None
}

#[cfg(windows)]
fn known_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();
    if let Some(local) = env::var_os("LOCALAPPDATA") {
        locations.push(PathBuf::from(local).join("Programs\\Microsoft VS Code\\bin\\code.cmd"));
    }
    locations.push(PathBuf::from(
        "C:\\Program Files\\Microsoft VS Code\\bin\\code.cmd",
    ));
    locations.push(PathBuf::from(
        "C:\\Program Files (x86)\\Microsoft VS Code\\bin\\code.cmd",
    ));
    locations
}

#[cfg(not(windows))]
fn known_locations() -> Vec<PathBuf> {
    vec![
        PathBuf::from("/usr/bin/code"),
        PathBuf::from("/usr/local/bin/code"),
        PathBuf::from("/snap/bin/code"),
    ]
}

/// Launch `descriptor` in `editor` without waiting for it.
///
/// The editor detaches on its own; its output is discarded.
pub fn launch(editor: &Path, descriptor: &Path) -> anyhow::Result<()> {
    info!(
        editor = %editor.display(),
        descriptor = %descriptor.display(),
        "Launching editor"
    );

    Command::new(editor)
        .arg(descriptor)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    Ok(())
}
