use crate::agents::package_catalog::PackageReference;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::warn;

/// `<PackageReference Include="..." ... Version="...">`, name before version.
static PACKAGE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<PackageReference\s+Include="([^"]+)"[^>]*Version="([^"]+)""#)
        .expect("package reference pattern is valid")
});

/// Extracts package references from descriptor text
#[derive(Debug, Default, Clone, Copy)]
pub struct ReferenceParser;

impl ReferenceParser {
    pub fn new() -> Self {
        Self
    }

    /// All declarations in `content`, in document order. Duplicates are kept.
    pub fn parse(&self, content: &str, source_file: &str) -> Vec<PackageReference> {
        PACKAGE_REFERENCE
            .captures_iter(content)
            .map(|caps| PackageReference {
                name: caps[1].to_string(),
                version: caps[2].to_string(),
                source_file: source_file.to_string(),
            })
            .collect()
    }

    /// Read and parse one descriptor. Unreadable files yield no references.
    pub fn parse_file(&self, path: &Path) -> Vec<PackageReference> {
        let source_file = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        match fs::read_to_string(path) {
            Ok(content) => self.parse(&content, &source_file),
            Err(e) => {
                warn!("Error parsing project file {}: {}", path.display(), e);
                Vec::new()
            }
        }
    }
}
