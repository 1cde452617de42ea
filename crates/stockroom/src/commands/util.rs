//! Shared helpers for command handlers.

use std::io::IsTerminal;

use stockroom_core::{CoreError, ListEditController, Resource, Stockroom};

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.trim_end_matches('?').into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Load a list through its controller and return the rows matching `search`.
///
/// The controller keeps failures as display state; here they become errors.
pub async fn load_filtered<R: Resource>(
    stockroom: &Stockroom,
    controller: &ListEditController<R>,
    search: Option<String>,
) -> Result<Vec<R::Entity>, CliError> {
    controller.load().await;
    ensure_session(stockroom)?;

    let state = controller.state();
    if let Some(message) = state.error {
        return Err(CliError::LoadFailed { message });
    }
    if let Some(term) = search {
        controller.set_search(term);
    }
    Ok(controller.filtered())
}

/// Map a controller write failure, preferring "session expired" when the
/// controller handed an unauthorized answer to the session store.
pub fn write_failure(stockroom: &Stockroom, err: CoreError) -> CliError {
    if err.is_unauthorized() && stockroom.session().state().user().is_none() {
        return CliError::SessionExpired;
    }
    err.into()
}

/// Fail if an unauthorized answer ended the session mid-command.
pub fn ensure_session(stockroom: &Stockroom) -> Result<(), CliError> {
    if stockroom.session().state().user().is_none() {
        return Err(CliError::SessionExpired);
    }
    Ok(())
}

/// Re-label a core `NotFound` with the resource the user asked for.
pub fn label_not_found(err: CoreError, resource_type: &str, id: i64, list_command: &str) -> CliError {
    match err {
        CoreError::NotFound { .. } => CliError::not_found(resource_type, id, list_command),
        other => other.into(),
    }
}

pub fn or_dash(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => "-",
    }
}
