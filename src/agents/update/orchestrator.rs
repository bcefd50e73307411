use crate::agents::package_catalog::PackageCatalog;
use crate::agents::project_locator::ProjectLocator;
use crate::agents::reference_parser::ReferenceParser;
use crate::agents::update::context::{AffectedProject, UpdateReport};
use crate::agents::version_rewriter::DescriptorEditor;
use crate::config::Settings;
use crate::error::{NuvcError, Result};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// UpdateOrchestrator ties the locator, parser, catalog, and rewriter together
/// for a set of workspace roots
#[derive(Debug, Clone)]
pub struct UpdateOrchestrator {
    roots: Vec<PathBuf>,
    locator: ProjectLocator,
    parser: ReferenceParser,
    show_progress: bool,
}

impl UpdateOrchestrator {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            locator: ProjectLocator::default(),
            parser: ReferenceParser::new(),
            show_progress: false,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.roots.clone()).with_locator(ProjectLocator::from_settings(settings))
    }

    pub fn with_locator(mut self, locator: ProjectLocator) -> Self {
        self.locator = locator;
        self
    }

    /// Draw a progress bar on stderr during rewrite passes
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Every descriptor file under every root
    pub fn locate(&self) -> Result<Vec<PathBuf>> {
        self.ensure_workspace()?;
        Ok(self.locator.locate_all(&self.roots))
    }

    /// Scan the workspace and build a fresh catalog
    pub fn rebuild(&self) -> Result<PackageCatalog> {
        let files = self.locate()?;
        let catalog: PackageCatalog = files
            .iter()
            .flat_map(|file| self.parser.parse_file(file))
            .collect();
        debug!(
            "Catalog rebuilt: {} package(s) from {} file(s)",
            catalog.len(),
            files.len()
        );
        Ok(catalog)
    }

    /// Projects whose first declaration of `package` differs from `target_version`
    pub fn affected_projects(
        &self,
        package: &str,
        target_version: &str,
    ) -> Result<Vec<AffectedProject>> {
        let affected = self
            .locate()?
            .iter()
            .filter_map(|file| {
                self.parser
                    .parse_file(file)
                    .into_iter()
                    .find(|reference| reference.name == package)
            })
            .filter(|reference| reference.version != target_version)
            .map(|reference| AffectedProject {
                project: reference.source_file,
                current_version: reference.version,
            })
            .collect();
        Ok(affected)
    }

    /// Set one package to `target_version` in every descriptor
    pub fn update_package(&self, package: &str, target_version: &str) -> Result<UpdateReport> {
        self.bulk_update(&[package.to_string()], target_version)
    }

    /// Set every named package to `target_version`, file by file
    ///
    /// A failed read or write aborts the rest of the pass.
    pub fn bulk_update(&self, packages: &[String], target_version: &str) -> Result<UpdateReport> {
        let files = self.locate()?;
        let mut report = UpdateReport::new(packages.to_vec(), target_version);

        let pb = self.progress_bar(files.len());
        for file in files {
            pb.set_message(display_name(&file));
            let editor = DescriptorEditor::new(&file);
            for package in packages {
                let changed = editor
                    .update_package_version(package, target_version)
                    .inspect_err(|_| pb.abandon())?;
                report.record(file.clone(), changed);
            }
            report.files_processed += 1;
            pb.inc(1);
        }
        pb.finish_and_clear();

        info!(
            "{} ({} of {} file(s) changed)",
            report.summary(),
            report.files_updated.len(),
            report.files_processed
        );
        Ok(report)
    }

    /// Fail with `NoWorkspace` when there are no roots to work on
    pub fn ensure_workspace(&self) -> Result<()> {
        if self.roots.is_empty() {
            warn!("No workspace folder is open");
            return Err(NuvcError::NoWorkspace);
        }
        Ok(())
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        let pb = ProgressBar::new(len as u64);
        if !self.show_progress {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        }
        if let Ok(style) = ProgressStyle::default_bar().template("  [{bar:40}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("=>-"));
        }
        pb
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
