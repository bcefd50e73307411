use crate::error::Result;
use crate::nuget::version::VersionComparator;
use tracing::warn;

pub mod factory;
pub use factory::RepositoryFactory;

/// Source of published versions for a package id
pub trait RepositoryClient: Send + Sync {
    /// All published versions, newest first. Unknown packages yield an empty list.
    fn fetch_available_versions(&self, package: &str) -> Result<Vec<String>>;

    fn fetch_latest_version(&self, package: &str, stable_only: bool) -> Result<Option<String>> {
        let versions = self.fetch_available_versions(package)?;
        Ok(VersionComparator::get_latest(&versions, stable_only))
    }
}

/// Versions for `package`, or an empty list if the lookup failed.
pub fn lookup_versions(client: &dyn RepositoryClient, package: &str) -> Vec<String> {
    client
        .fetch_available_versions(package)
        .unwrap_or_else(|e| {
            warn!("Failed to fetch versions for {}: {}", package, e);
            Vec::new()
        })
}
