use crate::error::{NuvcError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "nuvc.toml";

/// Descriptor suffix used when the settings don't name one.
pub const DEFAULT_EXTENSION: &str = ".csproj";

/// Timeout for registry requests in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Top-level `nuvc.toml` settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Workspace roots used when no `--path` is given
    pub roots: Vec<PathBuf>,
    /// File-name suffix that marks a project descriptor
    pub extension: String,
    /// Directory names skipped in addition to the built-in deny-set
    pub exclude: Vec<String>,
    pub registry: RegistrySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            roots: vec![PathBuf::from(".")],
            extension: DEFAULT_EXTENSION.to_string(),
            exclude: Vec::new(),
            registry: RegistrySettings::default(),
        }
    }
}

/// Package feed settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RegistrySettings {
    /// Service index URLs. Empty means "read nuget.config".
    pub sources: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Load settings from an explicit file, or from `./nuvc.toml` when present.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::from_file(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            NuvcError::Config(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        let settings = Self::parse(&content)
            .map_err(|e| NuvcError::Config(format!("{}: {}", path.display(), e)))?;
        tracing::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Replace the configured roots with the ones given on the command line.
    pub fn with_roots(mut self, roots: Vec<PathBuf>) -> Self {
        if !roots.is_empty() {
            self.roots = roots;
        }
        self
    }

    fn validate(&self) -> Result<()> {
        if self.extension.trim().is_empty() {
            return Err(NuvcError::Config("extension must not be empty".into()));
        }
        if self.registry.timeout_secs == 0 {
            return Err(NuvcError::Config(
                "registry.timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
