use crate::error::{NuvcError, Result};
use quick_xml::de::from_str;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

pub const NUGET_ORG_KEY: &str = "nuget.org";
pub const NUGET_ORG_URL: &str = "https://api.nuget.org/v3/index.json";

/// File names probed, in order, in the workspace root.
const CONFIG_FILE_NAMES: &[&str] = &["nuget.config", "NuGet.Config", "NuGet.config"];

/// A package feed from `nuget.config`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSource {
    pub key: String,
    pub url: String,
    pub protocol_version: Option<String>,
}

impl PackageSource {
    pub fn nuget_org() -> Self {
        Self {
            key: NUGET_ORG_KEY.to_string(),
            url: NUGET_ORG_URL.to_string(),
            protocol_version: Some("3".to_string()),
        }
    }

    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            key: url.clone(),
            url,
            protocol_version: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Configuration {
    #[serde(rename = "packageSources", default)]
    package_sources: Option<PackageSources>,
}

#[derive(Debug, Deserialize)]
struct PackageSources {
    #[serde(default)]
    add: Vec<AddEntry>,
}

#[derive(Debug, Deserialize)]
struct AddEntry {
    #[serde(rename = "@key")]
    key: Option<String>,
    #[serde(rename = "@value")]
    value: Option<String>,
    #[serde(rename = "@protocolVersion")]
    protocol_version: Option<String>,
}

/// Parse `<packageSources><add key=".." value=".."/></packageSources>`.
///
/// Entries without both `key` and `value` are skipped.
pub fn parse_sources(xml: &str) -> Result<Vec<PackageSource>> {
    let config: Configuration = from_str(xml)?;
    let sources = config
        .package_sources
        .map(|sources| sources.add)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|entry| match (entry.key, entry.value) {
            (Some(key), Some(url)) if !key.is_empty() && !url.is_empty() => Some(PackageSource {
                key,
                url,
                protocol_version: entry.protocol_version,
            }),
            _ => None,
        })
        .collect();
    Ok(sources)
}

/// Package sources for the workspace at `root`, falling back to nuget.org
pub fn load_sources(root: &Path) -> Vec<PackageSource> {
    let Some(path) = CONFIG_FILE_NAMES
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file())
    else {
        debug!("No nuget.config in {}, using nuget.org", root.display());
        return vec![PackageSource::nuget_org()];
    };

    let parsed = fs::read_to_string(&path)
        .map_err(NuvcError::from)
        .and_then(|content| parse_sources(&content));

    match parsed {
        Ok(sources) if !sources.is_empty() => {
            debug!("Using {} source(s) from {}", sources.len(), path.display());
            sources
        }
        Ok(_) => vec![PackageSource::nuget_org()],
        Err(e) => {
            warn!("Error parsing {}: {}", path.display(), e);
            vec![PackageSource::nuget_org()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const CONFIG: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<configuration>
  <packageSources>
    <clear />
    <add key="company" value="https://pkgs.example.com/nuget/v3/index.json" protocolVersion="3" />
    <add key="nuget.org" value="https://api.nuget.org/v3/index.json" />
    <add key="broken" />
  </packageSources>
  <packageSourceMapping />
</configuration>
"#;

    #[test]
    fn parses_add_entries_in_order() {
        let sources = parse_sources(CONFIG).unwrap();
        assert_eq!(
            sources,
            vec![
                PackageSource {
                    key: "company".into(),
                    url: "https://pkgs.example.com/nuget/v3/index.json".into(),
                    protocol_version: Some("3".into()),
                },
                PackageSource {
                    key: "nuget.org".into(),
                    url: "https://api.nuget.org/v3/index.json".into(),
                    protocol_version: None,
                },
            ]
        );
    }

    #[test]
    fn config_without_sources_parses_to_nothing() {
        assert!(parse_sources("<configuration />").unwrap().is_empty());
        assert!(
            parse_sources("<configuration><config /></configuration>")
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn load_sources_reads_workspace_config() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("NuGet.Config"), CONFIG).unwrap();
        let sources = load_sources(dir.path());
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].key, "company");
    }

    #[test]
    fn load_sources_falls_back_to_nuget_org() {
        let dir = tempdir().unwrap();
        assert_eq!(load_sources(dir.path()), vec![PackageSource::nuget_org()]);

        fs::write(dir.path().join("nuget.config"), "<configuration><packageSources>").unwrap();
        assert_eq!(load_sources(dir.path()), vec![PackageSource::nuget_org()]);
    }
}
