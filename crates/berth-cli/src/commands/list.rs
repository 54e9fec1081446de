//! List command - show catalog entries matching a filter.

use crate::app::App;
use crate::OutputFormat;
use berth_core::{filter, Config, Filter, Scope};
use std::path::PathBuf;

/// Run the list command.
pub fn run(
    config: Config,
    config_path: PathBuf,
    pattern: Option<&str>,
    tag: Option<&str>,
    pinned: bool,
    recent: bool,
    output: OutputFormat,
) -> anyhow::Result<()> {
    let app = App::new(config, config_path);
    let catalog = app.scan_blocking()?;

    if catalog.is_empty() {
        eprintln!(
            "No workspaces found under {}",
            app.config.general.root.display()
        );
        return Ok(());
    }

    let scope = if pinned {
        Scope::Pinned
    } else if recent {
        Scope::Recent
    } else {
        Scope::All
    };

    let mut query = Filter::new().with_scope(scope);
    if let Some(text) = pattern {
        query = query.with_text(text);
    }
    if let Some(tag) = tag {
        query = query.with_tag(tag);
    }

    let results = filter::apply(
        &catalog,
        &query,
        &app.config.shortlist.pinned,
        &app.config.shortlist.recent,
    );

    match output {
        OutputFormat::Text => {
            for ws in &results {
                let marker = if app.config.is_pinned(&ws.path_str()) {
                    "*"
                } else {
                    " "
                };
                let tags = if ws.tags.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", ws.tags.join(", "))
                };

                if ws.description.is_empty() {
                    println!("{} {}{}", marker, ws.name, tags);
                } else {
                    println!("{} {} - {}{}", marker, ws.name, ws.description, tags);
                }
                println!("     {}", ws.path.display());
            }

            eprintln!();
            eprintln!("{} of {} workspaces", results.len(), catalog.len());
        }
        OutputFormat::Json => {
            let json_results: Vec<serde_json::Value> = results
                .iter()
                .map(|ws| {
                    serde_json::json!({
                        "name": ws.name,
                        "path": ws.path,
                        "description": ws.description,
                        "modified": ws.modified.to_rfc3339(),
                        "tags": ws.tags,
                        "pinned": app.config.is_pinned(&ws.path_str()),
                    })
                })
                .collect();

            println!("{}", serde_json::to_string_pretty(&json_results)?);
        }
    }

    Ok(())
}
