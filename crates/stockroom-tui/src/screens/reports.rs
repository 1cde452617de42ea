//! Reports screen (administrators only): backend-computed valuation,
//! turnover, and fast/slow movers, plus CSV export.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use stockroom_core::Stockroom;
use stockroom_core::dashboard::{ViewData, load_reports};
use stockroom_core::model::{InventoryReport, Product};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::theme;
use crate::widgets::hint_line;

/// `inventory-report-YYYYMMDD.csv` for the given day.
pub fn export_file_name(date: chrono::NaiveDate) -> String {
    format!("inventory-report-{}.csv", date.format("%Y%m%d"))
}

pub struct ReportsScreen {
    focused: bool,
    action_tx: Option<UnboundedSender<Action>>,
    stockroom: Stockroom,
    data: Option<ViewData<InventoryReport>>,
    loading: bool,
    exporting: bool,
    throbber: ThrobberState,
}

impl ReportsScreen {
    pub fn new(stockroom: Stockroom) -> Self {
        Self {
            focused: false,
            action_tx: None,
            stockroom,
            data: None,
            loading: false,
            exporting: false,
            throbber: ThrobberState::default(),
        }
    }

    fn spawn_load(&mut self) {
        let Some(tx) = self.action_tx.clone() else {
            return;
        };
        self.loading = true;
        let stockroom = self.stockroom.clone();
        tokio::spawn(async move {
            let view = load_reports(stockroom.session()).await;
            let _ = tx.send(Action::ReportsLoaded(Box::new(view)));
        });
    }

    fn spawn_export(&mut self) {
        let Some(tx) = self.action_tx.clone() else {
            return;
        };
        if self.exporting {
            return;
        }
        self.exporting = true;
        let stockroom = self.stockroom.clone();
        tokio::spawn(async move {
            let path = export_file_name(chrono::Local::now().date_naive());
            let notification = match stockroom.export_csv().await {
                Ok(bytes) => match tokio::fs::write(&path, &bytes).await {
                    Ok(()) => {
                        info!(%path, bytes = bytes.len(), "report exported");
                        Notification::success(format!("Saved {path}"))
                    }
                    Err(e) => {
                        warn!(error = %e, %path, "could not write export");
                        Notification::error(format!("Could not write {path}: {e}"))
                    }
                },
                Err(e) => {
                    warn!(error = %e, "export failed");
                    Notification::error(e.display_message("Export failed"))
                }
            };
            let _ = tx.send(Action::Notify(notification));
            let _ = tx.send(Action::ExportFinished);
        });
    }

    fn panel(&self, title: &str) -> Block<'static> {
        Block::default()
            .title(format!(" {title} "))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            })
    }

    fn render_figures(frame: &mut Frame, area: Rect, report: &InventoryReport) {
        let cards = Layout::horizontal([Constraint::Ratio(1, 2); 2]).split(area);
        let figures = [
            (
                "Stock valuation",
                format!("${:.2}", report.stock_valuation),
                theme::SUCCESS_GREEN,
            ),
            (
                "Turnover rate",
                format!("{:.2}", report.turnover_rate),
                theme::NEON_CYAN,
            ),
        ];
        for ((label, value, color), card) in figures.into_iter().zip(cards.iter()) {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(color));
            let text = vec![
                Line::from(Span::styled(
                    value,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(label, theme::key_hint())),
            ];
            frame.render_widget(Paragraph::new(text).centered().block(block), *card);
        }
    }

    fn render_movers(&self, frame: &mut Frame, area: Rect, title: &str, products: &[Product]) {
        let header = Row::new(["Product", "Category", "Qty"].map(Cell::from))
            .style(theme::table_header());
        let rows: Vec<Row> = products
            .iter()
            .map(|p| {
                Row::new(vec![
                    Cell::from(p.name.clone()),
                    Cell::from(p.category.clone().unwrap_or_default()),
                    Cell::from(p.quantity.to_string())
                        .style(Style::default().fg(theme::stock_color(p))),
                ])
                .style(theme::table_row())
            })
            .collect();
        let table = Table::new(
            rows,
            [Constraint::Fill(2), Constraint::Fill(1), Constraint::Length(6)],
        )
        .header(header)
        .block(self.panel(title));
        frame.render_widget(table, area);
    }
}

impl Component for ReportsScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('r') => return Ok(Some(Action::Reload)),
            KeyCode::Char('s') => self.spawn_export(),
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Reload => self.spawn_load(),
            Action::ReportsLoaded(view) => {
                self.loading = false;
                self.data = Some((**view).clone());
            }
            Action::ExportFinished => self.exporting = false,
            Action::Tick if self.loading || self.exporting => self.throbber.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([
            Constraint::Length(1), // status
            Constraint::Length(4), // figures
            Constraint::Min(4),    // movers
            Constraint::Length(1), // hints
        ])
        .split(area);

        if self.loading || self.exporting {
            let label = if self.exporting {
                " Exporting\u{2026}"
            } else {
                " Refreshing\u{2026}"
            };
            let throbber = Throbber::default()
                .label(label)
                .style(Style::default().fg(theme::NEON_CYAN))
                .throbber_style(Style::default().fg(theme::ACCENT_PURPLE));
            frame.render_stateful_widget(throbber, layout[0], &mut self.throbber.clone());
        }

        match &self.data {
            Some(ViewData::Ready(report)) => {
                Self::render_figures(frame, layout[1], report);
                let tables = Layout::horizontal([Constraint::Ratio(1, 2); 2]).split(layout[2]);
                self.render_movers(frame, tables[0], "Fast moving", &report.fast_moving);
                self.render_movers(frame, tables[1], "Slow moving", &report.slow_moving);
            }
            Some(ViewData::Failed(message)) if !self.loading => {
                frame.render_widget(
                    Paragraph::new(Span::styled(format!(" \u{2717} {message} "), theme::error_banner())),
                    layout[0],
                );
            }
            _ => {}
        }

        frame.render_widget(
            Paragraph::new(hint_line(&[("r", "refresh"), ("s", "export CSV")])),
            layout[3],
        );
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
