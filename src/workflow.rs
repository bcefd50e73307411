use colored::Colorize;
use nuvc::agents::{
    PackageCatalog, PackageInfo, UpdateInteraction, UpdateOrchestrator, UpdateReport,
};
use nuvc::config::Settings;
use nuvc::error::{NuvcError, Result};
use nuvc::nuget::NuGetVersion;
use nuvc::panel::{self, PanelSession};
use nuvc::repository::RepositoryFactory;
use nuvc::utils::PathValidator;
use std::io;

/// Canonicalise the configured roots before anything reads them.
pub fn prepare(mut settings: Settings) -> Result<Settings> {
    settings.roots = PathValidator::validate_roots(&settings.roots)?;
    Ok(settings)
}

/// List every package in the workspace
pub fn execute_list(settings: &Settings, conflicts_only: bool, json: bool) -> Result<()> {
    let orchestrator = UpdateOrchestrator::from_settings(settings);
    if json {
        let catalog = orchestrator.rebuild()?;
        let packages: Vec<PackageInfo> = if conflicts_only {
            catalog.conflicts().cloned().collect()
        } else {
            catalog.packages()
        };
        return print_json(&packages);
    }

    println!("{}", "Listing NuGet packages in workspace...".cyan().bold());
    let catalog = scan_workspace(&orchestrator)?;

    if conflicts_only {
        let conflicts: Vec<&PackageInfo> = catalog.conflicts().collect();
        if conflicts.is_empty() {
            println!("\n{}", "✓ No version conflicts found".green());
            return Ok(());
        }
        println!(
            "\n{}",
            format!("{} package(s) with version conflicts:", conflicts.len()).yellow()
        );
        for info in conflicts {
            print_package(info);
        }
        return Ok(());
    }

    print_catalog(&catalog);
    Ok(())
}

/// Filter packages by name or declared version
pub fn execute_search(settings: &Settings, text: &str, json: bool) -> Result<()> {
    let orchestrator = UpdateOrchestrator::from_settings(settings);
    if json {
        let catalog = orchestrator.rebuild()?;
        return print_json(&catalog.filter(text).packages());
    }

    println!(
        "{}",
        format!("Searching packages for '{}'...", text).cyan().bold()
    );
    let catalog = scan_workspace(&orchestrator)?;
    let matches = catalog.filter(text);
    if matches.is_empty() {
        println!("\n{}", "No packages match.".yellow());
        return Ok(());
    }
    print_catalog(&matches);
    Ok(())
}

/// Set one package to a version across the workspace
pub fn execute_update(
    settings: &Settings,
    package: &str,
    version: Option<&str>,
    assume_yes: bool,
    include_prerelease: bool,
) -> Result<()> {
    println!(
        "{}",
        format!("Updating {} across the workspace...", package)
            .cyan()
            .bold()
    );

    let orchestrator = UpdateOrchestrator::from_settings(settings).with_progress(true);
    orchestrator.ensure_workspace()?;

    println!("\n{}", "1. Resolving target version...".yellow());
    let target_version = match version {
        Some(version) => version.to_string(),
        None => latest_version(settings, package, !include_prerelease)?,
    };
    println!("   Target: {}", target_version.green().bold());

    println!("\n{}", "2. Finding affected projects...".yellow());
    let affected = orchestrator.affected_projects(package, &target_version)?;
    if affected.is_empty() {
        println!(
            "{}",
            "All projects are already using the selected version.".green()
        );
        return Ok(());
    }
    println!("   {} project(s) will change", affected.len());

    let interaction = UpdateInteraction::new(!assume_yes);
    if !interaction.confirm_update(package, &target_version, &affected)? {
        println!("{}", "No changes were made.".yellow());
        return Ok(());
    }

    println!("\n{}", "3. Rewriting project files...".yellow());
    let report = orchestrator.update_package(package, &target_version)?;
    print_update_report(&report);

    rescan(&orchestrator)
}

/// Set several packages to one version across the workspace
pub fn execute_bulk_update(
    settings: &Settings,
    version: &str,
    packages: &[String],
    assume_yes: bool,
) -> Result<()> {
    println!(
        "{}",
        format!("Bulk updating {} package(s)...", packages.len())
            .cyan()
            .bold()
    );

    let orchestrator = UpdateOrchestrator::from_settings(settings).with_progress(true);
    orchestrator.ensure_workspace()?;
    let interaction = UpdateInteraction::new(!assume_yes);
    if !interaction.confirm_bulk(packages, version)? {
        println!("{}", "No changes were made.".yellow());
        return Ok(());
    }

    println!("\n{}", "1. Rewriting project files...".yellow());
    let report = orchestrator.bulk_update(packages, version)?;
    print_update_report(&report);

    rescan(&orchestrator)
}

/// Show the versions the configured feeds publish for a package
pub fn execute_versions(
    settings: &Settings,
    package: &str,
    stable_only: bool,
    limit: Option<usize>,
) -> Result<()> {
    println!(
        "{}",
        format!("Fetching versions of {}...", package).cyan().bold()
    );

    let sources = RepositoryFactory::sources_for(settings);
    println!("   Found {} package source(s):", sources.len());
    for source in &sources {
        println!("   • {} ({})", source.key.bright_cyan(), source.url.dimmed());
    }

    let client = RepositoryFactory::create_nuget(settings)?;
    let versions: Vec<String> = client
        .fetch_available_versions(package)?
        .into_iter()
        .filter(|v| !stable_only || NuGetVersion::parse(v).is_stable())
        .take(limit.unwrap_or(usize::MAX))
        .collect();

    if versions.is_empty() {
        println!("\n{}", format!("No versions found for {}", package).yellow());
        return Ok(());
    }

    println!();
    for version in versions {
        println!("  {}", version);
    }
    Ok(())
}

/// Run the panel protocol on stdin/stdout until stdin closes
pub fn execute_serve(settings: &Settings) -> Result<()> {
    let orchestrator = UpdateOrchestrator::from_settings(settings);
    orchestrator.ensure_workspace()?;
    let client = RepositoryFactory::create_nuget(settings)?;
    let mut session = PanelSession::new(orchestrator, client);

    let stdin = io::stdin();
    let stdout = io::stdout();
    panel::run(&mut session, stdin.lock(), stdout.lock())
}

fn latest_version(settings: &Settings, package: &str, stable_only: bool) -> Result<String> {
    let client = RepositoryFactory::create_nuget(settings)?;
    client
        .fetch_latest_version(package, stable_only)?
        .ok_or_else(|| NuvcError::Registry(format!("No published versions found for {package}")))
}

fn scan_workspace(orchestrator: &UpdateOrchestrator) -> Result<PackageCatalog> {
    println!("\n{}", "1. Locating project files...".yellow());
    for root in orchestrator.roots() {
        println!("   • {}", root.display().to_string().dimmed());
    }

    println!("\n{}", "2. Reading package references...".yellow());
    let catalog = orchestrator.rebuild()?;
    println!(
        "{}",
        format!(
            "✓ Found {} package(s) in {} reference(s)",
            catalog.len(),
            catalog.consumer_count()
        )
        .green()
    );
    Ok(catalog)
}

fn rescan(orchestrator: &UpdateOrchestrator) -> Result<()> {
    let catalog = orchestrator.rebuild()?;
    let remaining = catalog.conflicts().count();
    if remaining > 0 {
        println!(
            "{}",
            format!("{} package(s) still have version conflicts", remaining).yellow()
        );
    }
    Ok(())
}

fn print_catalog(catalog: &PackageCatalog) {
    println!();
    for info in catalog.iter() {
        print_package(info);
    }
}

fn print_package(info: &PackageInfo) {
    let versions = info.distinct_versions();
    let name = if info.has_conflict() {
        info.name.yellow().bold()
    } else {
        info.name.bright_cyan().bold()
    };

    if versions.len() == 1 {
        println!("  {} {}", name, versions[0].green());
    } else {
        println!("  {} {}", name, "(version conflict)".red());
    }

    for consumer in &info.consumers {
        println!(
            "    • {} {}",
            consumer.source_file.dimmed(),
            consumer.version
        );
    }
}

fn print_update_report(report: &UpdateReport) {
    if report.is_empty() {
        println!("{}", "✓ Nothing to change".green());
        return;
    }

    for file in &report.files_updated {
        println!("   • {}", file.display());
    }
    println!(
        "\n{}",
        format!(
            "✨ {} ({} of {} file(s) changed)",
            report.summary(),
            report.files_updated.len(),
            report.files_processed
        )
        .green()
        .bold()
    );
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_without_roots() -> Settings {
        let mut settings = Settings::default();
        settings.roots = Vec::new();
        settings.registry.sources = vec!["http://127.0.0.1:9/v3/index.json".to_string()];
        settings
    }

    #[test]
    fn update_without_roots_stops_before_registry_lookup() {
        let result = execute_update(&settings_without_roots(), "Serilog", None, true, false);
        assert!(matches!(result, Err(NuvcError::NoWorkspace)));
    }

    #[test]
    fn serve_without_roots_stops_before_reading_input() {
        let result = execute_serve(&settings_without_roots());
        assert!(matches!(result, Err(NuvcError::NoWorkspace)));
    }

    #[test]
    fn bulk_update_without_roots_is_a_notice() {
        let packages = vec!["Serilog".to_string()];
        let err = execute_bulk_update(&settings_without_roots(), "3.1.1", &packages, true)
            .unwrap_err();
        assert!(matches!(err, NuvcError::NoWorkspace));
        assert!(err.is_notice());
    }
}
