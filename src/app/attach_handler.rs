// ABOUTME: Final attach performed after the event loop has released the terminal
//
// Attaching seizes exclusive control of stdin/stdout, so the loop never
// attaches itself: it exits with `ExitRequest::QuitAndAttach` and the host
// calls `perform_attach` once raw mode is off and the alternate screen has
// been left.

use crate::tmux::TmuxClient;
use anyhow::{bail, Context, Result};
use tracing::info;

/// Attach the controlling terminal to `name`.
///
/// Inside tmux this switches the current client; outside it blocks until
/// the user detaches.
pub async fn perform_attach(client: &TmuxClient, name: &str) -> Result<()> {
    if !client.has_session(name).await {
        bail!("tmux session '{name}' does not exist");
    }

    info!("attaching to tmux session: {name}");
    client
        .attach(name)
        .await
        .with_context(|| format!("failed to attach to session '{name}'"))
}
