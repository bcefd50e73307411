use crate::error::{NuvcError, Result};
use crate::nuget::config::PackageSource;
use crate::nuget::version::VersionComparator;
use crate::repository::RepositoryClient;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Service index resource that serves flat-container version lists.
const PACKAGE_BASE_ADDRESS: &str = "PackageBaseAddress/3.0.0";
const MAX_RESPONSE_BYTES: usize = 10 * 1024 * 1024;

/// NuGet v3 feed client
pub struct NuGetClient {
    client: Client,
    sources: Vec<PackageSource>,
}

impl NuGetClient {
    /// Build a client for the given feeds. Sources that aren't http(s) URLs
    /// (local folder feeds, for instance) are skipped.
    pub fn new(sources: Vec<PackageSource>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("nuvc/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let sources = sources
            .into_iter()
            .filter(|source| match validate_source_url(&source.url) {
                Ok(_) => true,
                Err(e) => {
                    warn!("Skipping package source '{}': {}", source.key, e);
                    false
                }
            })
            .collect();

        Ok(Self { client, sources })
    }

    pub fn sources(&self) -> &[PackageSource] {
        &self.sources
    }

    /// Versions of `package` from the first source that lists any, newest first
    pub fn fetch_available_versions(&self, package: &str) -> Result<Vec<String>> {
        for source in &self.sources {
            match self.fetch_from_source(source, package) {
                Ok(versions) if !versions.is_empty() => {
                    debug!(
                        "Found {} version(s) of {} on {}",
                        versions.len(),
                        package,
                        source.key
                    );
                    return Ok(VersionComparator::sort_newest_first(versions));
                }
                Ok(_) => debug!("{} not found on {}", package, source.key),
                Err(e) => warn!("Error fetching from source {}: {}", source.key, e),
            }
        }

        Ok(Vec::new())
    }

    fn fetch_from_source(&self, source: &PackageSource, package: &str) -> Result<Vec<String>> {
        let index: ServiceIndex = self.get_json(&source.url)?.ok_or_else(|| {
            NuvcError::Registry(format!("service index not found at {}", source.url))
        })?;

        let base = index
            .resources
            .iter()
            .find(|resource| resource.has_type(PACKAGE_BASE_ADDRESS))
            .map(|resource| resource.id.clone())
            .ok_or_else(|| {
                NuvcError::Registry(format!(
                    "{} service not found in {}",
                    PACKAGE_BASE_ADDRESS, source.url
                ))
            })?;

        let separator = if base.ends_with('/') { "" } else { "/" };
        let versions_url = format!(
            "{}{}{}/index.json",
            base,
            separator,
            package.to_lowercase()
        );

        Ok(self
            .get_json::<FlatContainerIndex>(&versions_url)?
            .map(|index| index.versions)
            .unwrap_or_default())
    }

    /// GET and decode JSON; `None` on 404.
    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        debug!("Fetching: {}", url);
        let response = self.client.get(url).send()?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(NuvcError::Registry(format!("HTTP {status} from {url}")));
        }

        let text = response.text()?;
        if text.len() > MAX_RESPONSE_BYTES {
            return Err(NuvcError::Registry(format!(
                "response from {url} exceeded the 10MB limit"
            )));
        }

        Ok(Some(serde_json::from_str(&text)?))
    }
}

impl RepositoryClient for NuGetClient {
    fn fetch_available_versions(&self, package: &str) -> Result<Vec<String>> {
        NuGetClient::fetch_available_versions(self, package)
    }
}

fn validate_source_url(url: &str) -> Result<Url> {
    let parsed =
        Url::parse(url).map_err(|_| NuvcError::Config(format!("Invalid source URL: {url}")))?;

    match parsed.scheme() {
        "https" | "http" => Ok(parsed),
        scheme => Err(NuvcError::Config(format!(
            "Unsupported source scheme: {scheme}"
        ))),
    }
}

#[derive(Debug, Deserialize)]
struct ServiceIndex {
    #[serde(default)]
    resources: Vec<ServiceResource>,
}

#[derive(Debug, Deserialize)]
struct ServiceResource {
    #[serde(rename = "@id")]
    id: String,
    /// Either a single type string or a list of them
    #[serde(rename = "@type")]
    kind: serde_json::Value,
}

impl ServiceResource {
    fn has_type(&self, wanted: &str) -> bool {
        match &self.kind {
            serde_json::Value::String(kind) => kind == wanted,
            serde_json::Value::Array(kinds) => kinds.iter().any(|kind| kind == wanted),
            _ => false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct FlatContainerIndex {
    #[serde(default)]
    versions: Vec<String>,
}
