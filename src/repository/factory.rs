use crate::config::Settings;
use crate::error::Result;
use crate::nuget::{NuGetClient, PackageSource, load_sources};
use crate::repository::RepositoryClient;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Feeds from `[registry] sources` when set, otherwise the first root's
    /// `nuget.config`.
    pub fn create_nuget(settings: &Settings) -> Result<Arc<dyn RepositoryClient>> {
        let sources = Self::sources_for(settings);
        let timeout = Duration::from_secs(settings.registry.timeout_secs);
        Ok(Arc::new(NuGetClient::new(sources, timeout)?))
    }

    pub fn sources_for(settings: &Settings) -> Vec<PackageSource> {
        if !settings.registry.sources.is_empty() {
            return settings
                .registry
                .sources
                .iter()
                .map(PackageSource::from_url)
                .collect();
        }

        let root = settings
            .roots
            .first()
            .map(|root| root.as_path())
            .unwrap_or(Path::new("."));
        load_sources(root)
    }
}
