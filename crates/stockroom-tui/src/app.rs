//! Application core: event loop, route gating, action dispatch.
//!
//! The screen on display is never chosen directly. The app keeps the route
//! the user asked for and re-runs the route gate against the current
//! session whenever either changes.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs},
};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use stockroom_core::model::User;
use stockroom_core::{Route, SessionState, Stockroom, landing, navigation};

use crate::action::{Action, Notification, NotificationLevel};
use crate::component::Component;
use crate::event::{Event, EventReader, Rates};
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;
use crate::widgets::centered_rect;

const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Top-level application state and event loop.
pub struct App {
    stockroom: Stockroom,
    screens: HashMap<Route, Box<dyn Component>>,
    /// Route the user asked for; redirects overwrite it.
    requested: Route,
    /// Last session state seen from the bridge.
    session: SessionState,
    /// What the gate put on screen. `None` while the session restores.
    active: Option<Route>,
    running: bool,
    help_visible: bool,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    bridge_cancel: CancellationToken,
    notification: Option<(Notification, Instant)>,
    throbber: ThrobberState,
    rates: Rates,
}

impl App {
    pub fn new(stockroom: Stockroom, rates: Rates) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let screens = create_screens(&stockroom).into_iter().collect();
        let session = stockroom.session().state();

        Self {
            stockroom,
            screens,
            requested: Route::Root,
            session,
            active: None,
            running: true,
            help_visible: false,
            action_tx,
            action_rx,
            bridge_cancel: CancellationToken::new(),
            notification: None,
            throbber: ThrobberState::default(),
            rates,
        }
    }

    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        Ok(())
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.init_screens()?;
        self.regate()?;

        let stockroom = self.stockroom.clone();
        let tx = self.action_tx.clone();
        let cancel = self.bridge_cancel.clone();
        tokio::spawn(async move {
            crate::session_bridge::spawn_session_bridge(stockroom, tx, cancel).await;
        });

        let mut events = EventReader::new(self.rates);

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.bridge_cancel.cancel();
        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    // ── Routing ──────────────────────────────────────────────────

    /// Re-run the gate for the requested route and swap screens if the
    /// outcome changed. A newly shown screen gets a `Reload`.
    fn regate(&mut self) -> Result<()> {
        let landed = landing(&self.session, self.requested);
        if let Some(route) = landed {
            self.requested = route;
        }
        if landed == self.active {
            return Ok(());
        }

        debug!(from = ?self.active, to = ?landed, "switching screen");
        if let Some(screen) = self.active.and_then(|r| self.screens.get_mut(&r)) {
            screen.set_focused(false);
        }
        self.active = landed;
        if let Some(route) = landed {
            if let Some(screen) = self.screens.get_mut(&route) {
                screen.set_focused(true);
            }
            self.dispatch_to(route, &Action::Reload)?;
        }
        Ok(())
    }

    /// Routes the signed-in user can switch between.
    fn nav_routes(&self) -> Vec<Route> {
        self.session.user().map(navigation).unwrap_or_default()
    }

    fn dispatch_to(&mut self, route: Route, action: &Action) -> Result<()> {
        if let Some(screen) = self.screens.get_mut(&route) {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    // ── Input ────────────────────────────────────────────────────

    /// Global keys first, unless the active screen is taking text input.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        let Some(route) = self.active else {
            return Ok((key.code == KeyCode::Char('q')).then_some(Action::Quit));
        };

        let captures = self
            .screens
            .get(&route)
            .is_some_and(|screen| screen.captures_input());

        if !captures && !key.modifiers.contains(KeyModifiers::CONTROL) {
            let nav = self.nav_routes();
            match key.code {
                KeyCode::Char('q') => return Ok(Some(Action::Quit)),
                KeyCode::Char('?') => return Ok(Some(Action::ToggleHelp)),
                KeyCode::Char('L') => return Ok(Some(Action::Logout)),
                KeyCode::Char(c @ '1'..='9') => {
                    let idx = c
                        .to_digit(10)
                        .and_then(|d| usize::try_from(d - 1).ok())
                        .unwrap_or_default();
                    if let Some(target) = nav.get(idx) {
                        return Ok(Some(Action::Navigate(*target)));
                    }
                }
                KeyCode::Tab => {
                    if let Some(target) = cycle(&nav, route, true) {
                        return Ok(Some(Action::Navigate(target)));
                    }
                }
                KeyCode::BackTab => {
                    if let Some(target) = cycle(&nav, route, false) {
                        return Ok(Some(Action::Navigate(target)));
                    }
                }
                _ => {}
            }
        }

        match self.screens.get_mut(&route) {
            Some(screen) => screen.handle_key_event(key),
            None => Ok(None),
        }
    }

    // ── Dispatch ─────────────────────────────────────────────────

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::Resize(..) | Action::Render => {}

            Action::Navigate(route) => {
                self.requested = *route;
                self.regate()?;
            }

            Action::SessionChanged(state) => {
                self.session = state.clone();
                self.regate()?;
            }

            Action::Logout => {
                let session = self.stockroom.session().clone();
                tokio::spawn(async move {
                    session.logout().await;
                });
                self.action_tx
                    .send(Action::Notify(Notification::info("Signed out")))?;
            }

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::Notify(n) => self.notification = Some((n.clone(), Instant::now())),

            Action::DismissNotification => self.notification = None,

            Action::Tick => {
                if self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, shown)| shown.elapsed() > NOTIFICATION_TTL)
                {
                    self.action_tx.send(Action::DismissNotification)?;
                }
                if self.active.is_none() {
                    self.throbber.calc_next();
                }
                if let Some(route) = self.active {
                    self.dispatch_to(route, action)?;
                }
            }

            // Results of background work go to the screen that asked,
            // even if the user has moved on since.
            Action::LoginFailed(_) => self.dispatch_to(Route::Login, action)?,
            Action::DashboardLoaded(_) => self.dispatch_to(Route::Dashboard, action)?,
            Action::ReportsLoaded(_) | Action::ExportFinished => {
                self.dispatch_to(Route::Reports, action)?;
            }
            Action::Saved(route) => self.dispatch_to(*route, action)?,

            Action::Reload => {
                if let Some(route) = self.active {
                    self.dispatch_to(route, action)?;
                }
            }
        }
        Ok(())
    }

    // ── Rendering ────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let Some(route) = self.active else {
            self.render_restoring(frame, area);
            return;
        };

        // The login screen owns the whole frame.
        if route == Route::Login {
            if let Some(screen) = self.screens.get(&Route::Login) {
                screen.render(frame, area);
            }
            self.render_overlays(frame, area);
            return;
        }

        let layout = Layout::vertical([
            Constraint::Length(1), // header
            Constraint::Min(1),    // screen content
            Constraint::Length(1), // status bar
        ])
        .split(area);

        self.render_header(frame, layout[0], route);
        if let Some(screen) = self.screens.get(&route) {
            screen.render(frame, layout[1]);
        }
        self.render_status_bar(frame, layout[2]);
        self.render_overlays(frame, area);
    }

    fn render_overlays(&self, frame: &mut Frame, area: Rect) {
        if let Some((ref notif, _)) = self.notification {
            Self::render_notification(frame, area, notif);
        }
        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
    }

    fn render_restoring(&self, frame: &mut Frame, area: Rect) {
        let throbber = Throbber::default()
            .label(" Checking session\u{2026}")
            .style(Style::default().fg(theme::NEON_CYAN))
            .throbber_style(Style::default().fg(theme::ACCENT_PURPLE));
        frame.render_stateful_widget(
            throbber,
            centered_rect(area, 24, 1),
            &mut self.throbber.clone(),
        );
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, active: Route) {
        let nav = self.nav_routes();
        let titles: Vec<Line> = nav
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let style = if *r == active {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(format!(" {} {} ", i + 1, r.label()), style))
            })
            .collect();

        let user_label = self
            .session
            .user()
            .map(user_badge)
            .unwrap_or_default();
        #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
        let user_width = user_label.chars().count() as u16;

        let cols =
            Layout::horizontal([Constraint::Min(1), Constraint::Length(user_width)]).split(area);

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(nav.iter().position(|r| *r == active).unwrap_or(0));
        frame.render_widget(tabs, cols[0]);
        frame.render_widget(
            Paragraph::new(Span::styled(user_label, theme::title_style())),
            cols[1],
        );
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let server = self.stockroom.config().url.as_str().trim_end_matches('/');
        let line = Line::from(vec![
            Span::raw(" "),
            Span::styled(
                format!("\u{25CF} {server}"),
                Style::default().fg(theme::SUCCESS_GREEN),
            ),
            Span::styled(
                " \u{2502} 1-9 screens  ? help  L logout  q quit",
                theme::key_hint(),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let help_area = centered_rect(area, 56, 20);
        frame.render_widget(Clear, help_area);

        let block = Block::default()
            .title(" Keys ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_DARK));
        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let entry = |key: &'static str, desc: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
                Span::styled(desc, theme::key_hint()),
            ])
        };
        let heading = |text: &'static str| {
            Line::from(Span::styled(
                format!("  {text}"),
                Style::default().fg(theme::NEON_CYAN),
            ))
        };

        let help_text = vec![
            heading("Global"),
            entry("1-9", "Jump to screen"),
            entry("Tab", "Next screen"),
            entry("L", "Log out"),
            entry("?", "This help"),
            entry("q", "Quit"),
            Line::from(""),
            heading("Lists"),
            entry("j/k \u{2191}/\u{2193}", "Move"),
            entry("/", "Search"),
            entry("n", "New"),
            entry("e", "Edit"),
            entry("d", "Delete"),
            entry("r", "Reload"),
            entry("x", "Dismiss error"),
            Line::from(""),
            heading("Forms"),
            entry("Tab", "Next field"),
            entry("Enter / Esc", "Save / cancel"),
        ];
        frame.render_widget(Paragraph::new(help_text), inner);
    }

    fn render_notification(frame: &mut Frame, area: Rect, notif: &Notification) {
        #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
        let msg_len = notif.message.chars().count() as u16;
        let width = (msg_len + 6).clamp(20, 60);
        let height = 3u16;

        let x = area.width.saturating_sub(width + 1);
        let y = area.height.saturating_sub(height + 2);
        let toast_area = Rect::new(area.x + x, area.y + y, width.min(area.width), height);

        let (border_color, icon) = match notif.level {
            NotificationLevel::Success => (theme::SUCCESS_GREEN, "\u{2713}"),
            NotificationLevel::Error => (theme::ERROR_RED, "\u{2717}"),
            NotificationLevel::Info => (theme::NEON_CYAN, "\u{00B7}"),
        };

        frame.render_widget(Clear, toast_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color))
            .style(Style::default().bg(theme::BG_DARK));
        let inner = block.inner(toast_area);
        frame.render_widget(block, toast_area);

        let line = Line::from(vec![
            Span::styled(format!(" {icon} "), Style::default().fg(border_color)),
            Span::styled(notif.message.as_str(), Style::default().fg(theme::DIM_WHITE)),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
    }
}

/// Next (or previous) route in `nav` after `current`, wrapping. `None`
/// when `current` is not a navigation entry.
/// Header label for the signed-in user: `[PD] Pat Doe · STAFF `.
fn user_badge(user: &User) -> String {
    format!("[{}] {} \u{00B7} {} ", user.initials(), user.name, user.role)
}

fn cycle(nav: &[Route], current: Route, forward: bool) -> Option<Route> {
    let idx = nav.iter().position(|r| *r == current)?;
    let len = nav.len();
    let next = if forward {
        (idx + 1) % len
    } else {
        (idx + len - 1) % len
    };
    nav.get(next).copied()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use stockroom_core::ClientConfig;
    use stockroom_core::model::Role;

    use super::*;

    fn app() -> App {
        // Nothing listens on the discard port; background loads fail fast.
        let config = ClientConfig::new("http://127.0.0.1:9".parse().unwrap());
        App::new(Stockroom::new(config).unwrap(), Rates::default())
    }

    fn signed_in(role: Role) -> SessionState {
        SessionState::Authenticated(User {
            id: 1,
            name: "Pat Doe".into(),
            email: "pat@inventory.com".into(),
            role,
        })
    }

    #[test]
    fn cycling_wraps_and_skips_unknown_routes() {
        let nav = [Route::Dashboard, Route::Products, Route::Suppliers];
        assert_eq!(cycle(&nav, Route::Suppliers, true), Some(Route::Dashboard));
        assert_eq!(cycle(&nav, Route::Dashboard, false), Some(Route::Suppliers));
        assert_eq!(cycle(&nav, Route::Login, true), None);
    }

    #[test]
    fn header_badge_carries_initials_and_role() {
        let SessionState::Authenticated(user) = signed_in(Role::Staff) else {
            unreachable!()
        };
        assert_eq!(user_badge(&user), "[PD] Pat Doe \u{00B7} STAFF ");
    }

    #[tokio::test]
    async fn nothing_is_shown_until_the_session_resolves() {
        let mut app = app();
        app.regate().unwrap();
        assert_eq!(app.active, None);
    }

    #[tokio::test]
    async fn anonymous_users_land_on_login_and_go_to_dashboard_after_sign_in() {
        let mut app = app();
        app.process_action(&Action::Navigate(Route::Products)).unwrap();
        app.process_action(&Action::SessionChanged(SessionState::Anonymous))
            .unwrap();
        assert_eq!(app.active, Some(Route::Login));

        app.process_action(&Action::SessionChanged(signed_in(Role::Admin)))
            .unwrap();
        assert_eq!(app.active, Some(Route::Dashboard));
    }

    #[tokio::test]
    async fn staff_are_sent_back_to_the_dashboard_from_reports() {
        let mut app = app();
        app.process_action(&Action::SessionChanged(signed_in(Role::Staff)))
            .unwrap();
        app.process_action(&Action::Navigate(Route::Products)).unwrap();
        assert_eq!(app.active, Some(Route::Products));

        app.process_action(&Action::Navigate(Route::Reports)).unwrap();
        assert_eq!(app.active, Some(Route::Dashboard));
    }

    #[tokio::test]
    async fn expiry_returns_to_login() {
        let mut app = app();
        app.process_action(&Action::SessionChanged(signed_in(Role::Admin)))
            .unwrap();
        app.process_action(&Action::Navigate(Route::Reports)).unwrap();
        assert_eq!(app.active, Some(Route::Reports));

        app.process_action(&Action::SessionChanged(SessionState::Anonymous))
            .unwrap();
        assert_eq!(app.active, Some(Route::Login));
    }
}
