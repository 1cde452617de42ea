//! All possible UI actions. Actions are the sole mechanism for state mutation.

use stockroom_core::dashboard::{DashboardSummary, ViewData};
use stockroom_core::model::InventoryReport;
use stockroom_core::{Route, SessionState};

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A toast notification.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    /// Ask for a route; the gate decides what actually shows.
    Navigate(Route),
    /// The screen just became visible, or the user asked for fresh data.
    Reload,

    // ── Session ───────────────────────────────────────────────────
    SessionChanged(SessionState),
    LoginFailed(String),
    Logout,

    // ── Data ──────────────────────────────────────────────────────
    DashboardLoaded(Box<ViewData<DashboardSummary>>),
    ReportsLoaded(Box<ViewData<InventoryReport>>),
    /// A list screen's form was accepted by the backend.
    Saved(Route),
    ExportFinished,

    // ── Overlays ──────────────────────────────────────────────────
    ToggleHelp,
    Notify(Notification),
    DismissNotification,
}
