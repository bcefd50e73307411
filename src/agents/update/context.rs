use std::path::PathBuf;

/// Tracks what one rewrite pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Packages the pass was asked to rewrite
    pub packages: Vec<String>,
    /// Version every package was set to
    pub target_version: String,
    /// Descriptor files visited
    pub files_processed: usize,
    /// Descriptor files that were written, in visiting order
    pub files_updated: Vec<PathBuf>,
}

impl UpdateReport {
    pub fn new(packages: Vec<String>, target_version: impl Into<String>) -> Self {
        Self {
            packages,
            target_version: target_version.into(),
            files_processed: 0,
            files_updated: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, file: PathBuf, changed: bool) {
        if changed && !self.files_updated.contains(&file) {
            self.files_updated.push(file);
        }
    }

    /// Check if the pass wrote nothing
    pub fn is_empty(&self) -> bool {
        self.files_updated.is_empty()
    }

    /// The single user-facing summary of the pass
    pub fn summary(&self) -> String {
        match self.packages.as_slice() {
            [single] => format!(
                "Updated {} to version {} in all projects",
                single, self.target_version
            ),
            many => format!(
                "Updated {} packages to version {} across all projects",
                many.len(),
                self.target_version
            ),
        }
    }
}

/// A project whose declaration would change under an update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffectedProject {
    pub project: String,
    pub current_version: String,
}
