use crate::error::{NuvcError, Result};
use std::path::{Path, PathBuf};

const FORBIDDEN: &[&str] = &["/etc", "/sys", "/proc", "/dev", "/boot"];

/// Checks workspace roots before they are scanned or rewritten.
pub struct PathValidator;

impl PathValidator {
    /// Canonicalise a workspace root, rejecting files and system directories.
    pub fn validate_root(path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();

        let canonical = path.canonicalize().map_err(|e| {
            NuvcError::ProjectValidation(format!("Invalid path '{}': {e}", path.display()))
        })?;

        if !canonical.is_dir() {
            return Err(NuvcError::ProjectValidation(format!(
                "Path '{}' is not a directory",
                canonical.display()
            )));
        }

        if let Some(forbidden) = FORBIDDEN
            .iter()
            .find(|forbidden| Self::is_within(path, &canonical, Path::new(forbidden)))
        {
            return Err(NuvcError::ProjectValidation(format!(
                "Access to system directory '{forbidden}' is not allowed"
            )));
        }

        Ok(canonical)
    }

    /// Validate every root, keeping their order and dropping duplicates.
    pub fn validate_roots<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<PathBuf>> {
        let mut roots: Vec<PathBuf> = Vec::with_capacity(paths.len());
        for path in paths {
            let root = Self::validate_root(path)?;
            if !roots.contains(&root) {
                roots.push(root);
            }
        }
        Ok(roots)
    }

    fn is_within(raw: &Path, canonical: &Path, forbidden: &Path) -> bool {
        if raw.starts_with(forbidden) || canonical.starts_with(forbidden) {
            return true;
        }
        forbidden
            .canonicalize()
            .map(|resolved| canonical.starts_with(resolved))
            .unwrap_or(false)
    }
}
