//! Login screen: email and password, submitted to the session store.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use secrecy::SecretString;
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use stockroom_core::SessionStore;
use stockroom_core::accounts::{DEMO_ACCOUNTS, DemoAccount};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::form::{Field, Form, FormInput};
use crate::widgets::{centered_rect, hint_line};

const EMAIL: usize = 0;
const PASSWORD: usize = 1;

pub struct LoginScreen {
    focused: bool,
    action_tx: Option<UnboundedSender<Action>>,
    session: SessionStore,
    form: Form,
    error: Option<String>,
    submitting: bool,
    throbber: ThrobberState,
}

impl LoginScreen {
    pub fn new(session: SessionStore, email: Option<String>) -> Self {
        let mut form = Form::new(vec![
            Field::text("Email", email.clone().unwrap_or_default()),
            Field::secret("Password"),
        ]);
        if email.is_some() {
            form.focus = PASSWORD;
        }
        Self {
            focused: false,
            action_tx: None,
            session,
            form,
            error: None,
            submitting: false,
            throbber: ThrobberState::default(),
        }
    }

    fn submit(&mut self) {
        if self.submitting {
            return;
        }
        let email = self.form.text(EMAIL).trim().to_owned();
        let password = SecretString::from(self.form.text(PASSWORD).to_owned());
        self.submitting = true;
        self.error = None;

        let session = self.session.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let outcome = session.login(&email, &password).await;
            // Success flips the session state; the gate takes it from there.
            // Blank fields come back as a failure without a request.
            if let Some(message) = outcome.message() {
                debug!(%email, "login rejected");
                if let Some(tx) = tx {
                    let _ = tx.send(Action::LoginFailed(message));
                }
            }
        });
    }

    /// Prefill the form with a demo account; the user still submits.
    fn fill_demo(&mut self, account: &DemoAccount) {
        if let Some(field) = self.form.fields.get_mut(EMAIL) {
            field.value = account.email.to_owned();
        }
        if let Some(field) = self.form.fields.get_mut(PASSWORD) {
            field.value = account.password.to_owned();
        }
        self.form.focus = PASSWORD;
        self.error = None;
    }
}

impl Component for LoginScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        // F1, F2, ... fill the matching demo account
        if let KeyCode::F(n) = key.code {
            let account = usize::from(n)
                .checked_sub(1)
                .and_then(|i| DEMO_ACCOUNTS.get(i));
            if let Some(account) = account {
                self.fill_demo(account);
            }
            return Ok(None);
        }
        match self.form.handle_key(key) {
            FormInput::Submit => self.submit(),
            FormInput::Cancel => {
                if let Some(field) = self.form.fields.get_mut(PASSWORD) {
                    field.value.clear();
                }
            }
            FormInput::Edited | FormInput::Ignored => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::LoginFailed(message) => {
                self.submitting = false;
                self.error = Some(message.clone());
                if let Some(field) = self.form.fields.get_mut(PASSWORD) {
                    field.value.clear();
                }
                self.form.focus = PASSWORD;
            }
            // Shown again (startup or after logout): fresh attempt, last error kept.
            Action::Reload => {
                self.submitting = false;
                if let Some(field) = self.form.fields.get_mut(PASSWORD) {
                    field.value.clear();
                }
            }
            Action::Tick if self.submitting => self.throbber.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let panel = centered_rect(area, 56, 14);
        let block = Block::default()
            .title(" stockroom \u{00B7} sign in ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(panel);
        frame.render_widget(block, panel);

        let layout = Layout::vertical([
            Constraint::Length(1), // spacer
            Constraint::Length(2), // form
            Constraint::Length(1), // spacer
            Constraint::Length(1), // status
            Constraint::Length(1), // spacer
            Constraint::Length(3), // demo accounts
            Constraint::Min(0),
            Constraint::Length(1), // hints
        ])
        .split(inner);

        self.form.render(frame, layout[1]);

        if self.submitting {
            let throbber = Throbber::default()
                .label(" Signing in\u{2026}")
                .style(Style::default().fg(theme::NEON_CYAN))
                .throbber_style(Style::default().fg(theme::ACCENT_PURPLE));
            frame.render_stateful_widget(throbber, layout[3], &mut self.throbber.clone());
        } else if let Some(ref error) = self.error {
            frame.render_widget(
                Paragraph::new(Span::styled(format!(" \u{2717} {error}"), theme::error_banner())),
                layout[3],
            );
        }

        let mut demo = vec![Line::from(Span::styled(
            " Demo accounts",
            Style::default()
                .fg(theme::DIM_WHITE)
                .add_modifier(Modifier::BOLD),
        ))];
        demo.extend(DEMO_ACCOUNTS.iter().zip(1..).map(|(account, n)| {
            Line::from(vec![
                Span::styled(format!("   F{n} "), theme::key_hint_key()),
                Span::styled(
                    format!("{} / {}", account.email, account.password),
                    theme::key_hint(),
                ),
            ])
        }));
        frame.render_widget(Paragraph::new(demo), layout[5]);

        frame.render_widget(
            Paragraph::new(hint_line(&[
                ("Tab", "next"),
                ("Enter", "sign in"),
                ("F1-F2", "demo"),
                ("Ctrl+C", "quit"),
            ])),
            layout[7],
        );
    }

    fn captures_input(&self) -> bool {
        true
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
