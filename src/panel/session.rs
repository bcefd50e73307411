use crate::agents::{PackageCatalog, UpdateOrchestrator};
use crate::error::{NuvcError, Result};
use crate::panel::protocol::{PackageSelection, PanelCommand, PanelNotification};
use crate::repository::{RepositoryClient, lookup_versions};
use std::sync::Arc;
use tracing::{debug, error};

/// Packages picked in the panel and waiting for a `bulkUpdate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkSelection {
    pub packages: Vec<String>,
}

/// State behind one panel connection
///
/// Each command is handled to completion before the next one is read, so a
/// rescan never overlaps the rewrite pass that precedes it.
pub struct PanelSession {
    orchestrator: UpdateOrchestrator,
    catalog: PackageCatalog,
    client: Arc<dyn RepositoryClient>,
    bulk: Option<BulkSelection>,
}

impl PanelSession {
    pub fn new(orchestrator: UpdateOrchestrator, client: Arc<dyn RepositoryClient>) -> Self {
        Self {
            orchestrator,
            catalog: PackageCatalog::new(),
            client,
            bulk: None,
        }
    }

    pub fn catalog(&self) -> &PackageCatalog {
        &self.catalog
    }

    pub fn bulk_selection(&self) -> Option<&BulkSelection> {
        self.bulk.as_ref()
    }

    /// Scan the workspace and describe the result to the panel.
    pub fn open(&mut self) -> Vec<PanelNotification> {
        self.handle(PanelCommand::RefreshPackageList)
    }

    pub fn handle(&mut self, command: PanelCommand) -> Vec<PanelNotification> {
        debug!("Panel command: {:?}", command);
        match command {
            PanelCommand::Search { text } => vec![PanelNotification::UpdateResults {
                packages: self.catalog.filter(&text).packages(),
            }],
            PanelCommand::UpdatePackageVersions {
                package_name,
                target_version,
            } => self.update_package(&package_name, &target_version),
            PanelCommand::OpenBulkUpdate {
                packages,
                suggested_version,
            } => self.open_bulk_update(packages, suggested_version),
            PanelCommand::RefreshVersions => self.refresh_versions(),
            PanelCommand::BulkUpdate { target_version } => self.bulk_update(&target_version),
            PanelCommand::RefreshPackageList => self
                .refresh()
                .unwrap_or_else(|e| vec![Self::failure("Failed to refresh package list", e)]),
            PanelCommand::Cancel => {
                self.bulk = None;
                Vec::new()
            }
        }
    }

    fn update_package(&mut self, package: &str, target_version: &str) -> Vec<PanelNotification> {
        let report = match self.orchestrator.update_package(package, target_version) {
            Ok(report) => report,
            Err(e) => return vec![Self::failure("Failed to update package versions", e)],
        };

        let mut notifications = vec![PanelNotification::information(report.summary())];
        notifications.extend(self.refresh_after_update());
        notifications
    }

    fn open_bulk_update(
        &mut self,
        packages: Vec<PackageSelection>,
        suggested_version: Option<String>,
    ) -> Vec<PanelNotification> {
        let packages: Vec<String> = packages.into_iter().map(|p| p.name).collect();
        debug!(
            "Bulk update opened for {} package(s), suggested version {}",
            packages.len(),
            suggested_version.as_deref().unwrap_or("none")
        );
        self.bulk = Some(BulkSelection { packages });
        self.refresh_versions()
    }

    fn refresh_versions(&self) -> Vec<PanelNotification> {
        let Some(selection) = &self.bulk else {
            return vec![PanelNotification::warning("No bulk update is open")];
        };
        let Some(first) = selection.packages.first() else {
            return Vec::new();
        };

        vec![PanelNotification::UpdateVersions {
            versions: lookup_versions(self.client.as_ref(), first),
        }]
    }

    fn bulk_update(&mut self, target_version: &str) -> Vec<PanelNotification> {
        let Some(selection) = self.bulk.take() else {
            return vec![PanelNotification::warning("No bulk update is open")];
        };

        let report = match self
            .orchestrator
            .bulk_update(&selection.packages, target_version)
        {
            Ok(report) => report,
            Err(e) => {
                self.bulk = Some(selection);
                return vec![Self::failure("Failed to update package versions", e)];
            }
        };

        let mut notifications = vec![PanelNotification::information(report.summary())];
        notifications.extend(self.refresh_after_update());
        notifications
    }

    fn refresh_after_update(&mut self) -> Vec<PanelNotification> {
        self.refresh()
            .unwrap_or_else(|e| vec![Self::failure("Failed to refresh package list", e)])
    }

    fn refresh(&mut self) -> Result<Vec<PanelNotification>> {
        self.catalog = self.orchestrator.rebuild()?;
        Ok(vec![PanelNotification::RefreshPackages {
            packages: self.catalog.packages(),
        }])
    }

    fn failure(context: &str, e: NuvcError) -> PanelNotification {
        if e.is_notice() {
            return PanelNotification::warning(e.to_string());
        }
        error!("{}: {}", context, e);
        PanelNotification::error(format!("{context}: {e}"))
    }
}
