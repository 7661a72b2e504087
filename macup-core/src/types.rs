//! Domain types shared by the runner and the CLI.
//!
//! [`Tool`] enumerates every external program macup is allowed to spawn.
//! [`Whitelist`] is the frozen lookup table built from it; the executor
//! checks every invocation against it before anything is spawned.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Tool
// ---------------------------------------------------------------------------

/// An external maintenance tool macup may invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tool {
    /// Homebrew, the system package manager.
    Brew,
    /// The VS Code CLI (extension manager).
    Code,
    /// RubyGems.
    Gem,
    Npm,
    Yarn,
    /// The Rust crate manager.
    Cargo,
    /// Mac App Store CLI.
    Mas,
    /// The macOS software updater.
    SoftwareUpdate,
}

impl Tool {
    /// Every whitelisted tool, in catalog order.
    pub const ALL: [Tool; 8] = [
        Tool::Brew,
        Tool::Code,
        Tool::Gem,
        Tool::Npm,
        Tool::Yarn,
        Tool::Cargo,
        Tool::Mas,
        Tool::SoftwareUpdate,
    ];

    /// Executable name as resolved on `PATH`.
    pub fn binary(self) -> &'static str {
        match self {
            Tool::Brew => "brew",
            Tool::Code => "code",
            Tool::Gem => "gem",
            Tool::Npm => "npm",
            Tool::Yarn => "yarn",
            Tool::Cargo => "cargo",
            Tool::Mas => "mas",
            Tool::SoftwareUpdate => "softwareupdate",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary())
    }
}

impl FromStr for Tool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tool::ALL
            .into_iter()
            .find(|t| t.binary() == s)
            .ok_or_else(|| format!("'{s}' is not a whitelisted tool"))
    }
}

// ---------------------------------------------------------------------------
// Whitelist
// ---------------------------------------------------------------------------

/// Immutable set of executable names the executor may spawn.
///
/// Built once from [`Tool::ALL`]; there is no way to add entries at runtime.
#[derive(Debug)]
pub struct Whitelist {
    binaries: BTreeSet<&'static str>,
}

impl Whitelist {
    /// The process-wide whitelist.
    pub fn get() -> &'static Whitelist {
        static WHITELIST: OnceLock<Whitelist> = OnceLock::new();
        WHITELIST.get_or_init(|| Whitelist {
            binaries: Tool::ALL.iter().map(|t| t.binary()).collect(),
        })
    }

    pub fn contains(&self, binary: &str) -> bool {
        self.binaries.contains(binary)
    }

    /// Permitted executable names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.binaries.iter().copied()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
