pub mod package_catalog;
pub mod project_locator;
pub mod reference_parser;
pub mod version_rewriter;

pub mod update;
pub use update::{AffectedProject, UpdateInteraction, UpdateOrchestrator, UpdateReport};

pub use package_catalog::{PackageCatalog, PackageConsumer, PackageInfo, PackageReference};
pub use project_locator::{EXCLUDED_DIRS, ProjectLocator};
pub use reference_parser::ReferenceParser;
pub use version_rewriter::{DescriptorEditor, rewrite_content};
