//! Session bridge: forwards [`SessionStore`] watch updates to TUI actions.
//!
//! Runs as a background task: resolves the session once at startup, then
//! forwards every session transition as an [`Action::SessionChanged`] so
//! the app re-runs the route gate.
//!
//! [`SessionStore`]: stockroom_core::SessionStore

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use stockroom_core::{CoreError, LoginOutcome, Stockroom};

use crate::action::Action;

pub async fn spawn_session_bridge(
    stockroom: Stockroom,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut session = stockroom.session().subscribe();
    let _ = action_tx.send(Action::SessionChanged(session.borrow_and_update().clone()));

    // Reuse a live session, else sign in with configured credentials.
    // Without credentials the session settles on Anonymous and the gate
    // shows the login screen.
    match stockroom.connect().await {
        Ok(user) => info!(email = %user.email, "session open"),
        Err(CoreError::Config { .. }) => debug!("no stored credentials, waiting for login"),
        Err(e) => {
            warn!(error = %e, "automatic sign-in failed");
            let message = LoginOutcome::Failure(e).message().unwrap_or_default();
            let _ = action_tx.send(Action::LoginFailed(message));
        }
    }

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            changed = session.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = session.borrow_and_update().clone();
                debug!(?state, "session changed");
                let _ = action_tx.send(Action::SessionChanged(state));
            }
        }
    }

    debug!("session bridge shut down");
}
