//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

/// Queues `cmd` for the backend worker. On failure returns the reason to show the user.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Result<(), String> {
    let cmd_name = cmd.name();
    tracing::debug!(command = cmd_name, "queueing ui->backend command");

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(_)) => {
            tracing::warn!(command = cmd_name, "ui->backend command queue is full");
            Err("UI command queue is full; please retry".to_string())
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::error!(command = cmd_name, "ui->backend command queue disconnected");
            Err(
                "Backend command processor disconnected (possible startup/runtime failure)"
                    .to_string(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_core::RequestToken;
    use crossbeam_channel::bounded;

    #[test]
    fn reports_full_and_disconnected_queues() {
        let (tx, rx) = bounded::<BackendCommand>(1);
        let fetch = |n| BackendCommand::FetchPartners {
            token: RequestToken(n),
        };

        assert!(dispatch_backend_command(&tx, fetch(1)).is_ok());
        let full = dispatch_backend_command(&tx, fetch(2)).expect_err("queue full");
        assert!(full.contains("full"));

        drop(rx);
        let gone = dispatch_backend_command(&tx, fetch(3)).expect_err("disconnected");
        assert!(gone.contains("disconnected"));
    }
}
