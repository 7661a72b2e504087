//! The fixed, ordered task catalog.

use std::collections::HashSet;

use macup_core::Tool;

use crate::task::{Enumeration, Guard, Plan, Step, Task};

pub const HOMEBREW: &str = "Homebrew";
pub const VSCODE: &str = "VSCode";
pub const GEM: &str = "Gem";
pub const NODE: &str = "Node";
pub const CARGO: &str = "Cargo";
pub const APP_STORE: &str = "AppStore";
pub const MACOS: &str = "MacOS";

/// macOS ships its own Ruby; its `gem` is not user-managed.
pub const STOCK_GEM_PATH: &str = "/usr/bin/gem";

/// Ordered collection of tasks with unique names.
#[derive(Debug, Clone)]
pub struct Catalog {
    tasks: Vec<Task>,
}

impl Catalog {
    /// Build a catalog from `tasks`. Later tasks reusing a name are dropped.
    pub fn new(tasks: Vec<Task>) -> Self {
        let mut seen = HashSet::new();
        let tasks = tasks
            .into_iter()
            .filter(|task| {
                let fresh = seen.insert(task.name);
                if !fresh {
                    tracing::warn!(task = task.name, "duplicate task name, ignoring");
                }
                fresh
            })
            .collect();
        Self { tasks }
    }

    /// Every maintenance task macup knows, in display order.
    pub fn standard() -> Self {
        Self::new(vec![
            homebrew(),
            vscode(),
            gem(),
            node(),
            cargo(),
            app_store(),
            macos(),
        ])
    }

    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tasks.iter().map(|t| t.name).collect()
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.name == name)
    }
}

// ---------------------------------------------------------------------------
// Task definitions
// ---------------------------------------------------------------------------

fn homebrew() -> Task {
    Task::new(
        HOMEBREW,
        "Updating Brew Formulas",
        Plan::Fixed(vec![
            Step::required(Tool::Brew, &["update"]),
            Step::required(Tool::Brew, &["upgrade"]),
            Step::required(Tool::Brew, &["cleanup", "-s"]),
            Step::required(Tool::Brew, &["doctor"]).with_heading("Brew Diagnostics"),
            Step::required(Tool::Brew, &["missing"]),
        ]),
    )
    .guarded_by(Guard::silent("brew"))
}

fn vscode() -> Task {
    Task::new(
        VSCODE,
        "Updating VSCode Extensions",
        Plan::Fixed(vec![Step::required(Tool::Code, &["--update-extensions"])]),
    )
    .guarded_by(Guard::silent("code"))
}

fn gem() -> Task {
    Task::new(
        GEM,
        "Updating Gems",
        Plan::Fixed(vec![
            Step::required(Tool::Gem, &["update", "--user-install"]),
            Step::required(Tool::Gem, &["cleanup", "--user-install"]),
        ]),
    )
    .guarded_by(Guard::announce("gem").ignoring_stock(STOCK_GEM_PATH))
}

fn node() -> Task {
    Task::new(
        NODE,
        "Updating Node Packages",
        Plan::Fixed(vec![
            Step::skip_if_absent(Tool::Npm, &["update", "-g"])
                .with_heading("Updating Npm Packages"),
            Step::skip_if_absent(Tool::Yarn, &["global", "upgrade", "--latest"])
                .with_heading("Updating Yarn Packages"),
        ]),
    )
    .guarded_by(Guard::silent("node"))
}

fn cargo() -> Task {
    Task::new(
        CARGO,
        "Updating Rust Cargo Crates",
        Plan::Enumerated(Enumeration {
            listing: Step::required(Tool::Cargo, &["install", "--list"]),
            parse: parse_installed_crates,
            expand: |name| Step::required(Tool::Cargo, &["install", name]),
        }),
    )
    .guarded_by(Guard::silent("cargo"))
}

fn app_store() -> Task {
    Task::new(
        APP_STORE,
        "Updating App Store Applications",
        Plan::Fixed(vec![Step::required(Tool::Mas, &["upgrade"])]),
    )
    .guarded_by(Guard::silent("mas"))
}

fn macos() -> Task {
    Task::new(
        MACOS,
        "Updating MacOS",
        Plan::Fixed(vec![Step::required(Tool::SoftwareUpdate, &["-i", "-a"])]),
    )
}

// ---------------------------------------------------------------------------
// `cargo install --list` parsing
// ---------------------------------------------------------------------------

/// Crate names from `cargo install --list` output.
///
/// ```text
/// ripgrep v14.1.0:
///     rg
/// macup v0.1.0 (/Users/me/src/macup):
///     macup
/// ```
///
/// Only unindented `<name> v<version>[ (<source>)]:` headers count; binary
/// lines, blank lines and anything else are ignored. Order is kept,
/// duplicates are dropped.
pub fn parse_installed_crates(listing: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    listing
        .lines()
        .filter_map(crate_header_name)
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}

fn crate_header_name(line: &str) -> Option<&str> {
    if line.starts_with(char::is_whitespace) {
        return None;
    }
    let header = line.trim_end().strip_suffix(':')?;
    let mut fields = header.split_whitespace();
    let name = fields.next()?;
    let version = fields.next()?;

    let valid_name = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    let valid_version = version
        .strip_prefix('v')
        .and_then(|v| v.chars().next())
        .is_some_and(|c| c.is_ascii_digit());

    (valid_name && valid_version).then_some(name)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use macup_core::Whitelist;

    fn steps_of(task: &Task) -> Vec<Step> {
        match &task.plan {
            Plan::Fixed(steps) => steps.clone(),
            Plan::Enumerated(e) => vec![e.listing.clone(), (e.expand)("example")],
        }
    }

    #[test]
    fn standard_catalog_order() {
        assert_eq!(
            Catalog::standard().names(),
            vec!["Homebrew", "VSCode", "Gem", "Node", "Cargo", "AppStore", "MacOS"]
        );
    }

    #[test]
    fn every_step_uses_a_whitelisted_tool() {
        for task in Catalog::standard().all() {
            for step in steps_of(task) {
                assert!(
                    Whitelist::get().contains(step.tool.binary()),
                    "{} uses {}",
                    task.name,
                    step.tool
                );
                let args: Vec<&str> = step.args.iter().map(String::as_str).collect();
                assert!(crate::executor::validate(step.tool.binary(), &args).is_ok());
            }
        }
    }

    #[test]
    fn macos_has_one_required_step_and_no_guard() {
        let catalog = Catalog::standard();
        let task = catalog.get(MACOS).expect("MacOS task");
        assert!(task.guard.is_none());
        let steps = steps_of(task);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].gate, crate::task::Gate::Required);
        assert_eq!(steps[0].command_line(), "softwareupdate -i -a");
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let catalog = Catalog::standard();
        assert!(catalog.get("Homebrew").is_some());
        assert!(catalog.get("homebrew").is_none());
        assert!(catalog.get("Unknown").is_none());
    }

    #[test]
    fn duplicate_names_keep_first() {
        let first = Task::new("X", "first", Plan::Fixed(vec![]));
        let second = Task::new("X", "second", Plan::Fixed(vec![]));
        let catalog = Catalog::new(vec![first, second]);
        assert_eq!(catalog.all().len(), 1);
        assert_eq!(catalog.get("X").map(|t| t.banner), Some("first"));
    }

    #[test]
    fn parses_crate_headers_only() {
        let listing = "\
ripgrep v14.1.0:
    rg
cargo-edit v0.12.2:
    cargo-add
    cargo-rm

macup v0.1.0 (/Users/me/src/macup):
    macup
warning: something odd
not-a-header
bad name v1.0.0:
ripgrep v14.1.0:
";
        assert_eq!(
            parse_installed_crates(listing),
            vec!["ripgrep", "cargo-edit", "macup"]
        );
    }

    #[test]
    fn empty_listing_yields_nothing() {
        assert!(parse_installed_crates("").is_empty());
        assert!(parse_installed_crates("\n\n   \n").is_empty());
    }

    #[test]
    fn header_needs_version() {
        assert_eq!(crate_header_name("ripgrep:"), None);
        assert_eq!(crate_header_name("ripgrep vx:"), None);
        assert_eq!(crate_header_name("ripgrep v1.2.3"), None);
        assert_eq!(crate_header_name("ripgrep v1.2.3:"), Some("ripgrep"));
    }
}
