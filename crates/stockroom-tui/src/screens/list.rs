//! Generic list screen over a [`ListEditController`].
//!
//! Products, suppliers, and inventory logs share one screen implementation;
//! [`ListView`] supplies the columns, the row cells, and the mapping between
//! the controller's draft and the on-screen form.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table, TableState};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::watch;
use tracing::debug;

use stockroom_core::list_edit::StateOf;
use stockroom_core::{ListEditController, Resource, Route};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::theme;
use crate::widgets::form::{Form, FormInput};
use crate::widgets::{centered_rect, hint_line};

/// Presentation of one resource as a list screen.
pub trait ListView: Resource {
    const ROUTE: Route;
    /// Singular noun for prompts and toasts ("product").
    const NOUN: &'static str;
    /// `false` for append-only collections: no edit, no delete.
    const EDITABLE: bool = true;

    fn columns() -> Vec<(&'static str, Constraint)>;

    fn row(entity: &Self::Entity) -> Row<'static>;

    /// Form title for create mode.
    fn create_title() -> String {
        format!("New {}", Self::NOUN)
    }

    fn form(draft: &Self::Draft, lookups: &Self::Lookups) -> Form;

    /// Parse the form back into a draft. Errors are display text.
    fn read_form(form: &Form) -> Result<Self::Draft, String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Browse,
    Search,
    Editing,
    Confirm,
}

pub struct ListScreen<R: ListView> {
    focused: bool,
    action_tx: Option<UnboundedSender<Action>>,
    controller: ListEditController<R>,
    state: watch::Receiver<StateOf<R>>,
    table: TableState,
    mode: Mode,
    form: Form,
    form_error: Option<String>,
    throbber: ThrobberState,
}

impl<R: ListView> ListScreen<R> {
    pub fn new(controller: ListEditController<R>) -> Self {
        let state = controller.subscribe();
        Self {
            focused: false,
            action_tx: None,
            controller,
            state,
            table: TableState::default().with_selected(Some(0)),
            mode: Mode::Browse,
            form: Form::default(),
            form_error: None,
            throbber: ThrobberState::default(),
        }
    }

    fn send(&self, action: Action) {
        if let Some(tx) = &self.action_tx {
            let _ = tx.send(action);
        }
    }

    // ── Selection ────────────────────────────────────────────────

    fn selected(&self) -> Option<R::Entity> {
        let items = self.controller.filtered();
        let idx = self.table.selected().unwrap_or(0);
        items.get(idx.min(items.len().saturating_sub(1))).cloned()
    }

    #[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap, clippy::as_conversions)]
    fn move_selection(&mut self, delta: isize) {
        let len = self.controller.filtered().len();
        if len == 0 {
            return;
        }
        let current = self.table.selected().unwrap_or(0).min(len - 1) as isize;
        let next = (current + delta).clamp(0, len as isize - 1);
        self.table.select(Some(next as usize));
    }

    // ── Controller calls ─────────────────────────────────────────

    fn spawn_load(&self) {
        let controller = self.controller.clone();
        tokio::spawn(async move {
            controller.load().await;
        });
    }

    fn open_form(&mut self, editing: Option<&R::Entity>) {
        match editing {
            Some(entity) => self.controller.start_edit(entity),
            None => self.controller.cancel_edit(),
        }
        let state = self.controller.state();
        self.form = R::form(&state.form, &state.lookups);
        self.form_error = None;
        self.mode = Mode::Editing;
    }

    fn submit_form(&mut self) {
        let draft = match R::read_form(&self.form) {
            Ok(draft) => draft,
            Err(message) => {
                self.form_error = Some(message);
                return;
            }
        };
        self.form_error = None;
        self.controller.set_form(draft);

        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            // Failures land in the controller's banner or expire the session.
            if controller.submit().await.is_ok() {
                if let Some(tx) = tx {
                    let _ = tx.send(Action::Saved(R::ROUTE));
                }
            }
        });
    }

    fn close_form(&mut self) {
        self.controller.cancel_edit();
        self.form_error = None;
        self.mode = Mode::Browse;
    }

    fn confirm_delete(&mut self) {
        self.mode = Mode::Browse;
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            if controller.confirm_delete().await.is_ok() {
                if let Some(tx) = tx {
                    let _ = tx.send(Action::Notify(Notification::success(format!(
                        "Deleted {}",
                        R::NOUN
                    ))));
                }
            }
        });
    }

    // ── Key handling per mode ────────────────────────────────────

    fn handle_browse_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Char('g') => self.table.select(Some(0)),
            KeyCode::Char('G') => self.move_selection(isize::MAX / 2),
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.move_selection(10);
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.move_selection(-10);
            }
            KeyCode::Char('/') => self.mode = Mode::Search,
            KeyCode::Char('n') => self.open_form(None),
            KeyCode::Char('e') | KeyCode::Enter if R::EDITABLE => {
                if let Some(entity) = self.selected() {
                    self.open_form(Some(&entity));
                }
            }
            KeyCode::Char('d') if R::EDITABLE => {
                if let Some(entity) = self.selected() {
                    self.controller.request_delete(R::id(&entity));
                    self.mode = Mode::Confirm;
                }
            }
            KeyCode::Char('r') => return Some(Action::Reload),
            KeyCode::Char('x') => self.controller.dismiss_error(),
            _ => {}
        }
        None
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        let mut term = self.state.borrow().search_term.clone();
        match key.code {
            KeyCode::Enter => {
                self.mode = Mode::Browse;
                return;
            }
            KeyCode::Esc => {
                term.clear();
                self.mode = Mode::Browse;
            }
            KeyCode::Backspace => {
                term.pop();
            }
            KeyCode::Char(c) => term.push(c),
            _ => return,
        }
        self.controller.set_search(term);
        self.table.select(Some(0));
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y' | 'Y') | KeyCode::Enter => self.confirm_delete(),
            KeyCode::Char('n' | 'N') | KeyCode::Esc => {
                self.controller.cancel_delete();
                self.mode = Mode::Browse;
            }
            _ => {}
        }
    }

    // ── Rendering ────────────────────────────────────────────────

    fn render_status_line(&self, frame: &mut Frame, area: Rect, state: &StateOf<R>, shown: usize) {
        if state.loading {
            let throbber = Throbber::default()
                .label(" Loading\u{2026}")
                .style(Style::default().fg(theme::NEON_CYAN))
                .throbber_style(Style::default().fg(theme::ACCENT_PURPLE));
            frame.render_stateful_widget(throbber, area, &mut self.throbber.clone());
            return;
        }

        let mut spans = vec![Span::styled(" / ", theme::key_hint_key())];
        if self.mode == Mode::Search {
            spans.push(Span::styled(
                format!("{}\u{2588}", state.search_term),
                Style::default().fg(theme::NEON_CYAN),
            ));
        } else if state.search_term.is_empty() {
            spans.push(Span::styled("search", theme::key_hint()));
        } else {
            spans.push(Span::styled(
                state.search_term.clone(),
                Style::default().fg(theme::NEON_CYAN),
            ));
        }
        spans.push(Span::styled(
            format!("   {shown} of {}", state.items.len()),
            theme::key_hint(),
        ));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_table(&self, frame: &mut Frame, area: Rect, items: &[R::Entity]) {
        let columns = R::columns();
        let header = Row::new(
            columns
                .iter()
                .map(|(title, _)| Cell::from(*title).style(theme::table_header())),
        );
        let widths: Vec<Constraint> = columns.iter().map(|(_, w)| *w).collect();
        let rows: Vec<Row> = items.iter().map(|e| R::row(e).style(theme::table_row())).collect();

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected())
            .highlight_symbol("\u{25B8} ");

        let mut table_state = self.table;
        if items.is_empty() {
            table_state.select(None);
        } else {
            let idx = table_state.selected().unwrap_or(0).min(items.len() - 1);
            table_state.select(Some(idx));
        }
        frame.render_stateful_widget(table, area, &mut table_state);
    }

    fn render_form(&self, frame: &mut Frame, area: Rect, state: &StateOf<R>) {
        let title = if state.is_editing() {
            format!(" Edit {} ", R::NOUN)
        } else {
            format!(" {} ", R::create_title())
        };
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);
        self.form.render(frame, layout[0]);
        if let Some(ref message) = self.form_error {
            frame.render_widget(
                Paragraph::new(Span::styled(format!("  {message}"), theme::error_banner())),
                layout[1],
            );
        }
    }

    fn render_confirm(&self, frame: &mut Frame, area: Rect) {
        let popup = centered_rect(area, 44, 5);
        frame.render_widget(Clear, popup);
        let block = Block::default()
            .title(" Confirm ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::ERROR_RED))
            .style(Style::default().bg(theme::BG_DARK));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);
        let text = vec![
            Line::from(Span::styled(
                format!(" Delete this {}?", R::NOUN),
                Style::default().fg(theme::DIM_WHITE),
            )),
            Line::from(""),
            hint_line(&[("y", "delete"), ("n", "keep")]),
        ];
        frame.render_widget(Paragraph::new(text), inner);
    }

    fn hints(&self) -> Line<'static> {
        match self.mode {
            Mode::Browse if R::EDITABLE => hint_line(&[
                ("/", "search"),
                ("n", "new"),
                ("e", "edit"),
                ("d", "delete"),
                ("r", "reload"),
                ("x", "dismiss"),
            ]),
            Mode::Browse => hint_line(&[
                ("/", "search"),
                ("n", "record movement"),
                ("r", "reload"),
                ("x", "dismiss"),
            ]),
            Mode::Search => hint_line(&[("Enter", "keep"), ("Esc", "clear")]),
            Mode::Editing => hint_line(&[
                ("Tab", "next field"),
                ("\u{2190}/\u{2192}", "pick"),
                ("Enter", "save"),
                ("Esc", "cancel"),
            ]),
            Mode::Confirm => hint_line(&[("y", "delete"), ("n", "keep")]),
        }
    }
}

impl<R: ListView> Component for ListScreen<R> {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match self.mode {
            Mode::Browse => return Ok(self.handle_browse_key(key)),
            Mode::Search => self.handle_search_key(key),
            Mode::Confirm => self.handle_confirm_key(key),
            Mode::Editing => match self.form.handle_key(key) {
                FormInput::Submit => self.submit_form(),
                FormInput::Cancel => self.close_form(),
                FormInput::Edited | FormInput::Ignored => {}
            },
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Reload => {
                debug!(route = %R::ROUTE, "loading list");
                self.spawn_load();
            }
            Action::Saved(route) if *route == R::ROUTE => {
                self.form_error = None;
                self.mode = Mode::Browse;
                self.send(Action::Notify(Notification::success(format!(
                    "Saved {}",
                    R::NOUN
                ))));
            }
            Action::Tick => self.throbber.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let state = self.state.borrow().clone();
        let items = stockroom_core::list_edit::filter::<R>(&state.items, &state.search_term);

        let block = Block::default()
            .title(format!(" {} ", R::ROUTE.label()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
        let form_height = if self.mode == Mode::Editing {
            self.form.fields.len() as u16 + 3
        } else {
            0
        };
        let layout = Layout::vertical([
            Constraint::Length(u16::from(state.error.is_some())), // banner
            Constraint::Length(1),                                // search / status
            Constraint::Min(3),                                   // table
            Constraint::Length(form_height),                      // form
            Constraint::Length(1),                                // hints
        ])
        .split(inner);

        if let Some(ref error) = state.error {
            frame.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled(format!(" \u{2717} {error} "), theme::error_banner()),
                    Span::styled("  x dismiss", theme::key_hint()),
                ])),
                layout[0],
            );
        }

        self.render_status_line(frame, layout[1], &state, items.len());
        self.render_table(frame, layout[2], &items);
        if self.mode == Mode::Editing {
            self.render_form(frame, layout[3], &state);
        }
        frame.render_widget(Paragraph::new(self.hints()), layout[4]);

        if self.mode == Mode::Confirm {
            self.render_confirm(frame, area);
        }
    }

    fn captures_input(&self) -> bool {
        self.mode != Mode::Browse
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
