mod cli;
mod workflow;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use nuvc::config::Settings;
use nuvc::error::Result;
use std::process;

fn main() {
    let cli = Cli::parse();
    nuvc::logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        if e.is_notice() {
            println!("{}", e.to_string().yellow());
            return;
        }
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(cli.config.as_deref())?.with_roots(cli.paths);
    let settings = workflow::prepare(settings)?;

    match cli.command {
        Commands::List { conflicts, json } => workflow::execute_list(&settings, conflicts, json),
        Commands::Search { text, json } => workflow::execute_search(&settings, &text, json),
        Commands::Update {
            package,
            version,
            yes,
            include_prerelease,
        } => workflow::execute_update(
            &settings,
            &package,
            version.as_deref(),
            yes,
            include_prerelease,
        ),
        Commands::BulkUpdate {
            version,
            packages,
            yes,
        } => workflow::execute_bulk_update(&settings, &version, &packages, yes),
        Commands::Versions {
            package,
            stable_only,
            limit,
        } => workflow::execute_versions(&settings, &package, stable_only, limit),
        Commands::Serve => workflow::execute_serve(&settings),
    }
}
