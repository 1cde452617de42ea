//! A small keyboard-driven form: text inputs, masked inputs, numeric inputs,
//! and pickers cycled with Left/Right.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use rust_decimal::Decimal;

use crate::theme;

/// One entry of a picker field. `id: None` is the "nothing selected" entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub id: Option<i64>,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Rendered as dots.
    Secret,
    /// Accepts digits, one sign, one decimal point.
    Number,
    Picker(Vec<Choice>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub label: &'static str,
    pub kind: FieldKind,
    pub value: String,
    /// Index into the picker's choices.
    pub selected: usize,
}

impl Field {
    pub fn text(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            kind: FieldKind::Text,
            value: value.into(),
            selected: 0,
        }
    }

    pub fn secret(label: &'static str) -> Self {
        Self {
            label,
            kind: FieldKind::Secret,
            value: String::new(),
            selected: 0,
        }
    }

    pub fn number(label: &'static str, value: impl ToString) -> Self {
        Self {
            label,
            kind: FieldKind::Number,
            value: value.to_string(),
            selected: 0,
        }
    }

    /// A picker preselecting the choice whose id is `current` (or the first).
    pub fn picker(label: &'static str, choices: Vec<Choice>, current: Option<i64>) -> Self {
        let selected = choices.iter().position(|c| c.id == current).unwrap_or(0);
        Self {
            label,
            kind: FieldKind::Picker(choices),
            value: String::new(),
            selected,
        }
    }

    fn display(&self) -> String {
        match &self.kind {
            FieldKind::Secret => "\u{25CF}".repeat(self.value.chars().count()),
            FieldKind::Picker(choices) => choices
                .get(self.selected)
                .map_or_else(|| "-".to_owned(), |c| format!("\u{2039} {} \u{203A}", c.label)),
            FieldKind::Text | FieldKind::Number => self.value.clone(),
        }
    }

    fn accepts(&self, c: char) -> bool {
        match self.kind {
            FieldKind::Text | FieldKind::Secret => true,
            FieldKind::Number => {
                c.is_ascii_digit()
                    || (c == '-' && self.value.is_empty())
                    || (c == '.' && !self.value.contains('.'))
            }
            FieldKind::Picker(_) => false,
        }
    }

    fn cycle(&mut self, forward: bool) {
        let FieldKind::Picker(ref choices) = self.kind else {
            return;
        };
        let len = choices.len();
        if len == 0 {
            return;
        }
        self.selected = if forward {
            (self.selected + 1) % len
        } else {
            (self.selected + len - 1) % len
        };
    }
}

/// What a key press did to the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormInput {
    Edited,
    Submit,
    Cancel,
    Ignored,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    pub fields: Vec<Field>,
    pub focus: usize,
}

impl Form {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields, focus: 0 }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormInput {
        let len = self.fields.len();
        match key.code {
            KeyCode::Enter => return FormInput::Submit,
            KeyCode::Esc => return FormInput::Cancel,
            KeyCode::Tab | KeyCode::Down if len > 0 => self.focus = (self.focus + 1) % len,
            KeyCode::BackTab | KeyCode::Up if len > 0 => {
                self.focus = (self.focus + len - 1) % len;
            }
            KeyCode::Left | KeyCode::Right => {
                let forward = key.code == KeyCode::Right;
                match self.fields.get_mut(self.focus) {
                    Some(field) => field.cycle(forward),
                    None => return FormInput::Ignored,
                }
            }
            KeyCode::Backspace => match self.fields.get_mut(self.focus) {
                Some(field) => {
                    field.value.pop();
                }
                None => return FormInput::Ignored,
            },
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                match self.fields.get_mut(self.focus) {
                    Some(field) => field.value.clear(),
                    None => return FormInput::Ignored,
                }
            }
            KeyCode::Char(c) => match self.fields.get_mut(self.focus) {
                Some(field) if field.accepts(c) => field.value.push(c),
                _ => return FormInput::Ignored,
            },
            _ => return FormInput::Ignored,
        }
        FormInput::Edited
    }

    pub fn text(&self, idx: usize) -> &str {
        self.fields.get(idx).map_or("", |f| f.value.as_str())
    }

    /// The picked id, `None` for the empty entry or a non-picker field.
    pub fn picked(&self, idx: usize) -> Option<i64> {
        let field = self.fields.get(idx)?;
        match &field.kind {
            FieldKind::Picker(choices) => choices.get(field.selected).and_then(|c| c.id),
            _ => None,
        }
    }

    /// Whole number from a numeric field. Blank reads as zero.
    pub fn integer(&self, idx: usize) -> Result<i32, String> {
        let raw = self.text(idx).trim();
        if raw.is_empty() {
            return Ok(0);
        }
        raw.parse()
            .map_err(|_| format!("{} must be a whole number", self.label(idx)))
    }

    /// Decimal from a numeric field. Blank reads as zero.
    pub fn decimal(&self, idx: usize) -> Result<Decimal, String> {
        let raw = self.text(idx).trim();
        if raw.is_empty() {
            return Ok(Decimal::ZERO);
        }
        raw.parse()
            .map_err(|_| format!("{} must be a number", self.label(idx)))
    }

    fn label(&self, idx: usize) -> &'static str {
        self.fields.get(idx).map_or("Field", |f| f.label)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let label_width = self
            .fields
            .iter()
            .map(|f| f.label.len())
            .max()
            .unwrap_or(0);

        let lines: Vec<Line> = self
            .fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let active = i == self.focus;
                let label_style = if active {
                    theme::key_hint_key()
                } else {
                    Style::default().fg(theme::DIM_WHITE)
                };
                let mut value = field.display();
                if active && !matches!(field.kind, FieldKind::Picker(_)) {
                    value.push('\u{2588}');
                }
                Line::from(vec![
                    Span::styled(if active { "\u{25B8} " } else { "  " }, label_style),
                    Span::styled(format!("{:<label_width$}  ", field.label), label_style),
                    Span::styled(value, Style::default().fg(theme::NEON_CYAN)),
                ])
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), area);
    }
}
