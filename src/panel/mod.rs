// Panel module - the message contract of the package browser panel
//
// - protocol: tagged commands and notifications, one JSON object per line
// - session: dispatches commands against the workspace catalog
// - server: drives a session over a reader/writer pair
pub mod protocol;
pub mod server;
pub mod session;

pub use protocol::{PackageSelection, PanelCommand, PanelNotification};
pub use server::run;
pub use session::{BulkSelection, PanelSession};
