//! Mock backend: a Tokio runtime on its own thread that waits out reply
//! delays so the UI thread never blocks.

use crossbeam_channel::{Receiver, TryRecvError};
use std::time::Duration;
use tokio::runtime::Runtime;

use crate::protocol::BackendAction;

/// How often the loop checks for new actions from the UI.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

pub fn run_backend(action_rx: Receiver<BackendAction>) {
    // Create a Tokio runtime for this thread
    let rt = match Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            log::error!("Failed to create Tokio runtime: {}", e);
            return;
        }
    };

    rt.block_on(async move {
        loop {
            // Check for actions from the UI (non-blocking)
            match action_rx.try_recv() {
                Ok(BackendAction::AwaitReply(pending)) => {
                    tokio::spawn(async move {
                        // Failures are reported to the UI by the store itself
                        let _ = pending.complete().await;
                    });
                }
                Ok(BackendAction::Shutdown) | Err(TryRecvError::Disconnected) => {
                    log::debug!("Backend shutting down");
                    break;
                }
                Err(TryRecvError::Empty) => {
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
            }
        }
    });
    // Dropping the runtime cancels in-flight replies; their guards clear
    // the loading flag.
}
