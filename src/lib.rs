//! Scan .NET workspaces for `<PackageReference>` declarations, aggregate them
//! into a package catalog, and rewrite versions in place.

pub mod agents;
pub mod config;
pub mod error;
pub mod logging;
pub mod nuget;
pub mod panel;
pub mod repository;
pub mod utils;

pub use error::{NuvcError, Result};
