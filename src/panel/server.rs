use crate::error::Result;
use crate::panel::protocol::{PanelCommand, PanelNotification};
use crate::panel::session::PanelSession;
use std::io::{BufRead, Write};
use tracing::{debug, warn};

/// Serve one panel over line-delimited JSON until the reader is exhausted.
pub fn run<R: BufRead, W: Write>(
    session: &mut PanelSession,
    reader: R,
    mut writer: W,
) -> Result<()> {
    send(&mut writer, &session.open())?;

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let notifications = match PanelCommand::decode(line) {
            Ok(command) => session.handle(command),
            Err(e) => {
                warn!("Rejected panel message: {}", e);
                vec![PanelNotification::error(e.to_string())]
            }
        };
        send(&mut writer, &notifications)?;
    }

    debug!("Panel input closed");
    Ok(())
}

fn send<W: Write>(writer: &mut W, notifications: &[PanelNotification]) -> Result<()> {
    for notification in notifications {
        writeln!(writer, "{}", notification.encode()?)?;
    }
    writer.flush()?;
    Ok(())
}
