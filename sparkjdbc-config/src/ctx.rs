use std::path::{Path, PathBuf};

/// Context data when processing a configuration file
pub(crate) struct Ctx {
    /// Path of the current config file
    pub path: Option<PathBuf>,
}

impl Ctx {
    pub(crate) fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    #[cfg(test)]
    pub fn mock() -> Self {
        Self { path: None }
    }

    /// The directory containing the config file, if loaded from a file
    pub fn dir(&self) -> Option<&Path> {
        self.path
            .as_deref()
            .and_then(|p| p.parent())
            .filter(|p| !p.as_os_str().is_empty())
    }
}
