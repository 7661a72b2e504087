//! Host tool lookup.

use std::path::PathBuf;

/// Answers whether an executable can be found on the host.
pub trait ToolResolver {
    /// Absolute path the executable resolves to, if any.
    fn resolve(&self, binary: &str) -> Option<PathBuf>;

    fn is_present(&self, binary: &str) -> bool {
        self.resolve(binary).is_some()
    }
}

/// Resolves executables against `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathResolver;

impl ToolResolver for PathResolver {
    fn resolve(&self, binary: &str) -> Option<PathBuf> {
        which::which(binary).ok()
    }
}
