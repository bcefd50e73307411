use nuvc::agents::{PackageCatalog, UpdateOrchestrator};
use nuvc::config::Settings;
use nuvc::utils::PathValidator;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn versions_of(catalog: &PackageCatalog, name: &str) -> Vec<String> {
    catalog
        .get(name)
        .map(|info| info.consumers.iter().map(|c| c.version.clone()).collect())
        .unwrap_or_default()
}

#[test]
fn scan_resolve_conflict_and_rescan() {
    let dir = tempdir().unwrap();
    let root = dir.path();

    write(
        root,
        "src/Api/Api.csproj",
        r#"<Project Sdk="Microsoft.NET.Sdk.Web">
  <ItemGroup>
    <PackageReference Include="Newtonsoft.Json" Version="12.0.1" />
    <PackageReference Include="Serilog" Version="3.1.1" PrivateAssets="all" />
  </ItemGroup>
</Project>
"#,
    );
    write(
        root,
        "src/Worker/Worker.csproj",
        "<Project>\r\n  <ItemGroup>\r\n    <PackageReference Include=\"Newtonsoft.Json\" Version=\"13.0.3\" />\r\n  </ItemGroup>\r\n</Project>\r\n",
    );
    write(
        root,
        "src/Worker/bin/Debug/Copy.csproj",
        r#"<PackageReference Include="Newtonsoft.Json" Version="9.0.1" />"#,
    );
    write(
        root,
        "packages/Vendor/Vendor.csproj",
        r#"<PackageReference Include="Newtonsoft.Json" Version="6.0.0" />"#,
    );
    write(root, "nuvc.toml", "exclude = [\"packages\"]\n");

    let settings = Settings::from_file(&root.join("nuvc.toml"))
        .unwrap()
        .with_roots(vec![root.to_path_buf()]);
    let roots = PathValidator::validate_roots(&settings.roots).unwrap();
    let settings = settings.with_roots(roots);
    let orchestrator = UpdateOrchestrator::from_settings(&settings);

    let catalog = orchestrator.rebuild().unwrap();
    assert_eq!(versions_of(&catalog, "Newtonsoft.Json"), vec!["12.0.1", "13.0.3"]);
    let conflicts: Vec<&str> = catalog.conflicts().map(|info| info.name.as_str()).collect();
    assert_eq!(conflicts, vec!["Newtonsoft.Json"]);

    let affected = orchestrator
        .affected_projects("Newtonsoft.Json", "13.0.3")
        .unwrap();
    assert_eq!(affected.len(), 1);
    assert_eq!(affected[0].project, "Api.csproj");

    let report = orchestrator
        .update_package("Newtonsoft.Json", "13.0.3")
        .unwrap();
    assert_eq!(report.files_processed, 2);
    assert_eq!(report.files_updated.len(), 1);

    let catalog = orchestrator.rebuild().unwrap();
    assert_eq!(catalog.conflicts().count(), 0);
    assert_eq!(versions_of(&catalog, "Serilog"), vec!["3.1.1"]);

    let api = fs::read_to_string(root.join("src/Api/Api.csproj")).unwrap();
    assert!(api.contains(
        r#"<PackageReference Include="Serilog" Version="3.1.1" PrivateAssets="all" />"#
    ));
    let worker = fs::read_to_string(root.join("src/Worker/Worker.csproj")).unwrap();
    assert!(worker.contains("\r\n"));
    let skipped = fs::read_to_string(root.join("src/Worker/bin/Debug/Copy.csproj")).unwrap();
    assert!(skipped.contains("9.0.1"));
    let vendor = fs::read_to_string(root.join("packages/Vendor/Vendor.csproj")).unwrap();
    assert!(vendor.contains("6.0.0"));
}

#[test]
fn bulk_update_then_search() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(
        root,
        "Silo/Silo.csproj",
        r#"<PackageReference Include="Microsoft.Orleans.Server" Version="7.2.0" />
<PackageReference Include="Microsoft.Orleans.Sdk" Version="7.2.0" />"#,
    );
    write(
        root,
        "Client/Client.csproj",
        r#"<PackageReference Include="Microsoft.Orleans.Client" Version="7.1.0" />"#,
    );

    let orchestrator = UpdateOrchestrator::new(vec![root.to_path_buf()]);
    let catalog = orchestrator.rebuild().unwrap();
    let selected: Vec<String> = catalog
        .filter("orleans")
        .names()
        .map(str::to_string)
        .collect();
    assert_eq!(selected.len(), 3);

    let report = orchestrator.bulk_update(&selected, "8.2.0").unwrap();
    assert_eq!(
        report.summary(),
        "Updated 3 packages to version 8.2.0 across all projects"
    );

    let catalog = orchestrator.rebuild().unwrap();
    let hits = catalog.filter("8.2.0");
    assert_eq!(hits.len(), 3);
    assert!(catalog.filter("7.").is_empty());
}
