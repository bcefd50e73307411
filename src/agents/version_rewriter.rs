use crate::error::{NuvcError, Result};
use regex::{Captures, Regex};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Replace the version of every `<PackageReference>` naming `package`.
///
/// Returns `None` when nothing changed.
pub fn rewrite_content(content: &str, package: &str, version: &str) -> Option<String> {
    let pattern = format!(
        r#"(<PackageReference\s+Include="{}"[^>]*Version=")([^"]+)(")"#,
        regex::escape(package)
    );
    let regex = match Regex::new(&pattern) {
        Ok(regex) => regex,
        Err(e) => {
            error!("Invalid rewrite pattern for '{}': {}", package, e);
            return None;
        }
    };

    let rewritten = regex.replace_all(content, |caps: &Captures| {
        format!("{}{}{}", &caps[1], version, &caps[3])
    });

    if rewritten == content {
        None
    } else {
        Some(rewritten.into_owned())
    }
}

/// DescriptorEditor rewrites package versions inside one descriptor file
pub struct DescriptorEditor {
    path: PathBuf,
}

impl DescriptorEditor {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrite `package` to `version`, writing only if the content changes.
    ///
    /// Returns whether the file was written. The write is synced to disk before
    /// returning.
    pub fn update_package_version(&self, package: &str, version: &str) -> Result<bool> {
        let content = fs::read_to_string(&self.path).map_err(|e| self.failure(e))?;

        let Some(updated) = rewrite_content(&content, package, version) else {
            return Ok(false);
        };

        self.write(&updated).map_err(|e| self.failure(e))?;
        debug!("Set {} to {} in {}", package, version, self.path.display());
        Ok(true)
    }

    fn write(&self, content: &str) -> std::io::Result<()> {
        let mut file = File::create(&self.path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()
    }

    fn failure(&self, source: std::io::Error) -> NuvcError {
        error!(
            "Error updating package version in {}: {}",
            self.path.display(),
            source
        );
        NuvcError::Descriptor {
            path: self.path.clone(),
            source,
        }
    }
}
