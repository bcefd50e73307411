pub mod client;
pub mod config;
pub mod version;

pub use client::NuGetClient;
pub use config::{PackageSource, load_sources, parse_sources};
pub use version::{NuGetVersion, VersionComparator};
