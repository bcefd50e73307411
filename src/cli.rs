use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "nuvc",
    about = "NuGet Version Catalog - scan .csproj files and keep package versions aligned",
    version,
    author
)]
pub struct Cli {
    /// Workspace root to scan (repeatable; defaults to the configured roots)
    #[arg(short, long = "path", value_name = "DIR", global = true)]
    pub paths: Vec<PathBuf>,

    /// Settings file (defaults to ./nuvc.toml when present)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every package referenced in the workspace
    List {
        /// Only show packages declared with more than one version
        #[arg(long)]
        conflicts: bool,

        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search packages by name or declared version
    Search {
        /// Case-insensitive text to look for
        #[arg(value_name = "TEXT")]
        text: String,

        /// Print the matches as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set one package to a version in every project
    Update {
        /// Package id (e.g. Newtonsoft.Json)
        #[arg(value_name = "PACKAGE")]
        package: String,

        /// Target version (defaults to the newest published version)
        #[arg(value_name = "VERSION")]
        version: Option<String>,

        /// Apply without asking for confirmation
        #[arg(short, long)]
        yes: bool,

        /// Allow pre-release versions when picking the newest version
        #[arg(long)]
        include_prerelease: bool,
    },

    /// Set several packages to the same version in every project
    BulkUpdate {
        /// Target version
        #[arg(value_name = "VERSION")]
        version: String,

        /// Package ids to update
        #[arg(value_name = "PACKAGE", required = true)]
        packages: Vec<String>,

        /// Apply without asking for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the versions published for a package
    Versions {
        /// Package id
        #[arg(value_name = "PACKAGE")]
        package: String,

        /// Hide pre-release versions
        #[arg(long)]
        stable_only: bool,

        /// Show at most N versions
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
    },

    /// Speak the package panel protocol on stdin/stdout
    Serve,
}
