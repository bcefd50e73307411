use crate::config::{DEFAULT_EXTENSION, Settings};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Directory names that are never descended into.
pub const EXCLUDED_DIRS: &[&str] = &["node_modules", "bin", "obj", ".git"];

/// ProjectLocator finds project descriptor files below a workspace root
#[derive(Debug, Clone)]
pub struct ProjectLocator {
    extension: String,
    extra_excluded: Vec<String>,
}

impl Default for ProjectLocator {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSION)
    }
}

impl ProjectLocator {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            extra_excluded: Vec::new(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.extension.as_str()).with_excluded(settings.exclude.clone())
    }

    /// Add directory names to skip on top of [`EXCLUDED_DIRS`].
    pub fn with_excluded(mut self, names: Vec<String>) -> Self {
        self.extra_excluded = names;
        self
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Every descriptor below each root, roots in the order given.
    pub fn locate_all<P: AsRef<Path>>(&self, roots: &[P]) -> Vec<PathBuf> {
        roots
            .iter()
            .flat_map(|root| self.locate(root.as_ref()))
            .collect()
    }

    /// Every descriptor below `root`, in pre-order with entries sorted by name.
    pub fn locate(&self, root: &Path) -> Vec<PathBuf> {
        let mut found = Vec::new();
        self.walk(root, &mut found);
        debug!(
            "Found {} '{}' file(s) under {}",
            found.len(),
            self.extension,
            root.display()
        );
        found
    }

    fn walk(&self, dir: &Path, found: &mut Vec<PathBuf>) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Error reading directory {}: {}", dir.display(), e);
                return;
            }
        };

        let mut entries: Vec<_> = entries
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Error reading entry in {}: {}", dir.display(), e);
                    None
                }
            })
            .collect();
        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            // file_type() does not follow symlinks, so links are neither walked nor matched
            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(e) => {
                    warn!("Error inspecting {}: {}", entry.path().display(), e);
                    continue;
                }
            };

            let name = entry.file_name();
            let name = name.to_string_lossy();

            if file_type.is_dir() {
                if !self.is_excluded(&name) {
                    self.walk(&entry.path(), found);
                }
            } else if file_type.is_file() && name.ends_with(self.extension.as_str()) {
                found.push(entry.path());
            }
        }
    }

    fn is_excluded(&self, name: &str) -> bool {
        EXCLUDED_DIRS.contains(&name) || self.extra_excluded.iter().any(|extra| extra == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(root: &Path, relative: &str) -> PathBuf {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "<Project />").unwrap();
        path
    }

    #[test]
    fn finds_descriptors_in_nested_directories() {
        let dir = tempdir().unwrap();
        let api = touch(dir.path(), "src/Api/Api.csproj");
        let core = touch(dir.path(), "src/Core/Core.csproj");
        let tests = touch(dir.path(), "tests/deep/er/Tests.csproj");
        touch(dir.path(), "src/Api/Program.cs");
        touch(dir.path(), "README.csproj.md");

        let found = ProjectLocator::default().locate(dir.path());
        assert_eq!(found, vec![api, core, tests]);
    }

    #[test]
    fn never_enters_excluded_directories_at_any_depth() {
        let dir = tempdir().unwrap();
        let kept = touch(dir.path(), "a/b/c/Kept.csproj");
        for excluded in EXCLUDED_DIRS {
            touch(dir.path(), &format!("{excluded}/Top.csproj"));
            touch(dir.path(), &format!("a/b/{excluded}/Nested.csproj"));
            touch(dir.path(), &format!("a/{excluded}/x/y/Deep.csproj"));
        }

        let found = ProjectLocator::default().locate(dir.path());
        assert_eq!(found, vec![kept]);
        for path in &found {
            for component in path.strip_prefix(dir.path()).unwrap().components() {
                let name = component.as_os_str().to_string_lossy();
                assert!(!EXCLUDED_DIRS.contains(&name.as_ref()));
            }
        }
    }

    #[test]
    fn configured_exclusions_add_to_the_fixed_set() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "packages/Vendored.csproj");
        touch(dir.path(), "bin/Built.csproj");
        let app = touch(dir.path(), "App/App.csproj");

        let locator = ProjectLocator::default().with_excluded(vec!["packages".to_string()]);
        assert_eq!(locator.locate(dir.path()), vec![app]);
    }

    #[test]
    fn honours_custom_extension() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "App/App.csproj");
        let fs_proj = touch(dir.path(), "Lib/Lib.fsproj");

        let found = ProjectLocator::new(".fsproj").locate(dir.path());
        assert_eq!(found, vec![fs_proj]);
    }

    #[test]
    fn empty_and_missing_roots_yield_nothing() {
        let dir = tempdir().unwrap();
        let locator = ProjectLocator::default();
        assert!(locator.locate(dir.path()).is_empty());
        assert!(locator.locate(&dir.path().join("missing")).is_empty());
    }

    #[test]
    fn unreadable_root_is_skipped_and_walk_continues() {
        let dir = tempdir().unwrap();
        let not_a_dir = touch(dir.path(), "Stray.csproj");
        let good = tempdir().unwrap();
        let app = touch(good.path(), "App/App.csproj");

        let locator = ProjectLocator::default();
        assert!(locator.locate(&not_a_dir).is_empty());
        assert_eq!(locator.locate_all(&[not_a_dir.as_path(), good.path()]), vec![app]);
    }

    // Root bypasses directory modes, so this only exercises the skip as a normal user.
    #[cfg(unix)]
    #[test]
    fn unreadable_subdirectory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let kept = touch(dir.path(), "a/Kept.csproj");
        touch(dir.path(), "locked/Hidden.csproj");
        let locked = dir.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        let enforced = fs::read_dir(&locked).is_err();

        let found = ProjectLocator::default().locate(dir.path());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        if enforced {
            assert_eq!(found, vec![kept]);
        }
    }

    #[test]
    fn locate_all_concatenates_roots_in_order() {
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        let b = touch(second.path(), "B.csproj");
        let a = touch(first.path(), "A.csproj");

        let found = ProjectLocator::default().locate_all(&[second.path(), first.path()]);
        assert_eq!(found, vec![b, a]);
    }

    #[cfg(unix)]
    #[test]
    fn does_not_follow_symlinks() {
        let dir = tempdir().unwrap();
        let real = touch(dir.path(), "real/Real.csproj");
        std::os::unix::fs::symlink(dir.path(), dir.path().join("real/loop")).unwrap();
        std::os::unix::fs::symlink(&real, dir.path().join("Link.csproj")).unwrap();

        let found = ProjectLocator::default().locate(dir.path());
        assert_eq!(found, vec![real]);
    }
}
