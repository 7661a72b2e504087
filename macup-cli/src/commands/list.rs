//! `macup list` — available updates and the saved selection.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use macup_runner::{Catalog, Plan};

use super::config_store;

/// Arguments for `macup list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,

    /// Config file to read (default: ~/.macup.json).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListJson {
    updates: Vec<UpdateJson>,
    unknown_selections: Vec<String>,
}

#[derive(Debug, Serialize)]
struct UpdateJson {
    name: &'static str,
    description: &'static str,
    selected: bool,
}

#[derive(Tabled)]
struct UpdateRow {
    #[tabled(rename = "update")]
    name: &'static str,
    #[tabled(rename = "selected")]
    selected: &'static str,
    #[tabled(rename = "runs")]
    runs: String,
}

impl ListArgs {
    pub fn run(self) -> Result<()> {
        let store = config_store(self.config.as_deref())?;
        let config = store
            .load()
            .with_context(|| format!("failed to load {}", store.path().display()))?;
        let catalog = Catalog::standard();

        let is_selected = |name: &str| config.selected_updates.iter().any(|s| s == name);
        let unknown: Vec<String> = config
            .selected_updates
            .iter()
            .filter(|s| catalog.get(s).is_none())
            .cloned()
            .collect();

        if self.json {
            let payload = ListJson {
                updates: catalog
                    .all()
                    .iter()
                    .map(|task| UpdateJson {
                        name: task.name,
                        description: task.banner,
                        selected: is_selected(task.name),
                    })
                    .collect(),
                unknown_selections: unknown,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&payload).context("failed to serialize list JSON")?
            );
            return Ok(());
        }

        let rows: Vec<UpdateRow> = catalog
            .all()
            .iter()
            .map(|task| UpdateRow {
                name: task.name,
                selected: if is_selected(task.name) { "yes" } else { "" },
                runs: match &task.plan {
                    Plan::Fixed(steps) => steps
                        .iter()
                        .map(|s| s.command_line())
                        .collect::<Vec<_>>()
                        .join("; "),
                    Plan::Enumerated(e) => format!("{} → reinstall each", e.listing.command_line()),
                },
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");

        for name in &unknown {
            println!("{} saved selection '{name}' is not a known update", "!".yellow().bold());
        }
        if !config.has_selection() {
            println!("No saved selection. Run `macup` to choose updates.");
        }
        Ok(())
    }
}
