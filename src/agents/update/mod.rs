// Update module - locate, parse, aggregate, and rewrite across a workspace
//
// - UpdateOrchestrator: drives the locator, parser, catalog, and rewriter
// - UpdateReport: tracks what a rewrite pass changed
// - UpdateInteraction: confirmation prompts for the command line
pub mod context;
pub mod interaction;
pub mod orchestrator;

pub use context::{AffectedProject, UpdateReport};
pub use interaction::UpdateInteraction;
pub use orchestrator::UpdateOrchestrator;
