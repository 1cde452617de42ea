//! Dashboard screen: headline figures, stock breakdown, and the latest
//! low-stock products and movements.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Gauge, Paragraph, Row, Table};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::mpsc::UnboundedSender;

use stockroom_core::SessionStore;
use stockroom_core::dashboard::{DashboardSummary, StockBreakdown, ViewData, load_dashboard};
use stockroom_core::model::MovementType;

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::hint_line;

pub struct DashboardScreen {
    focused: bool,
    action_tx: Option<UnboundedSender<Action>>,
    session: SessionStore,
    data: Option<ViewData<DashboardSummary>>,
    loading: bool,
    throbber: ThrobberState,
}

impl DashboardScreen {
    pub fn new(session: SessionStore) -> Self {
        Self {
            focused: false,
            action_tx: None,
            session,
            data: None,
            loading: false,
            throbber: ThrobberState::default(),
        }
    }

    fn spawn_load(&mut self) {
        let Some(tx) = self.action_tx.clone() else {
            return;
        };
        self.loading = true;
        let session = self.session.clone();
        tokio::spawn(async move {
            let view = load_dashboard(&session).await;
            let _ = tx.send(Action::DashboardLoaded(Box::new(view)));
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

    fn render_cards(frame: &mut Frame, area: Rect, summary: &DashboardSummary) {
        let cards = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);
        let figures = [
            ("Products", summary.total_products.to_string(), theme::NEON_CYAN),
            ("Low stock", summary.low_stock_count.to_string(), theme::AMBER),
            (
                "Suppliers",
                summary.distinct_suppliers.to_string(),
                theme::ACCENT_PURPLE,
            ),
            (
                "Stock value",
                format!("${:.2}", summary.stock_valuation),
                theme::SUCCESS_GREEN,
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

    fn render_breakdown(&self, frame: &mut Frame, area: Rect, breakdown: &StockBreakdown) {
        let block = self.panel("Stock levels");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let total = breakdown.in_stock + breakdown.low_stock + breakdown.out_of_stock;
        let rows = Layout::vertical([Constraint::Length(1); 3]).split(inner);
        let bands = [
            ("In stock", breakdown.in_stock, theme::SUCCESS_GREEN),
            ("Low", breakdown.low_stock, theme::AMBER),
            ("Out", breakdown.out_of_stock, theme::ERROR_RED),
        ];
        for ((label, count, color), row) in bands.into_iter().zip(rows.iter()) {
            #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
            let ratio = if total == 0 {
                0.0
            } else {
                count as f64 / total as f64
            };
            let gauge = Gauge::default()
                .gauge_style(Style::default().fg(color).bg(theme::BG_HIGHLIGHT))
                .ratio(ratio)
                .label(format!("{label} {count}"));
            frame.render_widget(gauge, *row);
        }
    }

    fn render_low_stock(&self, frame: &mut Frame, area: Rect, summary: &DashboardSummary) {
        let header = Row::new(["Product", "Qty", "Reorder"].map(Cell::from))
            .style(theme::table_header());
        let rows: Vec<Row> = summary
            .low_stock
            .iter()
            .map(|p| {
                Row::new(vec![
                    Cell::from(p.name.clone()),
                    Cell::from(p.quantity.to_string())
                        .style(Style::default().fg(theme::stock_color(p))),
                    Cell::from(p.reorder_level.to_string()),
                ])
                .style(theme::table_row())
            })
            .collect();
        let table = Table::new(
            rows,
            [Constraint::Fill(1), Constraint::Length(6), Constraint::Length(8)],
        )
        .header(header)
        .block(self.panel("Low stock"));
        frame.render_widget(table, area);
    }

    fn render_recent(&self, frame: &mut Frame, area: Rect, summary: &DashboardSummary) {
        let header =
            Row::new(["When", "Product", "Type", "Qty"].map(Cell::from)).style(theme::table_header());
        let rows: Vec<Row> = summary
            .recent_logs
            .iter()
            .map(|log| {
                let color = match log.movement {
                    MovementType::In => theme::SUCCESS_GREEN,
                    MovementType::Out => theme::AMBER,
                };
                Row::new(vec![
                    Cell::from(
                        log.created_at
                            .map(|t| t.format("%m-%d %H:%M").to_string())
                            .unwrap_or_default(),
                    ),
                    Cell::from(log.product_name().unwrap_or("-").to_owned()),
                    Cell::from(log.movement.to_string()).style(Style::default().fg(color)),
                    Cell::from(log.quantity.to_string()),
                ])
                .style(theme::table_row())
            })
            .collect();
        let table = Table::new(
            rows,
            [
                Constraint::Length(11),
                Constraint::Fill(1),
                Constraint::Length(4),
                Constraint::Length(6),
            ],
        )
        .header(header)
        .block(self.panel("Recent movements"));
        frame.render_widget(table, area);
    }
}

impl Component for DashboardScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        Ok(match key.code {
            KeyCode::Char('r') => Some(Action::Reload),
            _ => None,
        })
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Reload => self.spawn_load(),
            Action::DashboardLoaded(view) => {
                self.loading = false;
                self.data = Some((**view).clone());
            }
            Action::Tick if self.loading => self.throbber.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([
            Constraint::Length(1), // status
            Constraint::Length(4), // cards
            Constraint::Length(5), // breakdown
            Constraint::Min(4),    // tables
            Constraint::Length(1), // hints
        ])
        .split(area);

        if self.loading {
            let throbber = Throbber::default()
                .label(" Refreshing\u{2026}")
                .style(Style::default().fg(theme::NEON_CYAN))
                .throbber_style(Style::default().fg(theme::ACCENT_PURPLE));
            frame.render_stateful_widget(throbber, layout[0], &mut self.throbber.clone());
        }

        match &self.data {
            Some(ViewData::Ready(summary)) => {
                Self::render_cards(frame, layout[1], summary);
                self.render_breakdown(frame, layout[2], &summary.breakdown);
                let tables = Layout::horizontal([Constraint::Ratio(1, 2); 2]).split(layout[3]);
                self.render_low_stock(frame, tables[0], summary);
                self.render_recent(frame, tables[1], summary);
            }
            Some(ViewData::Failed(message)) if !self.loading => {
                frame.render_widget(
                    Paragraph::new(Span::styled(format!(" \u{2717} {message} "), theme::error_banner())),
                    layout[0],
                );
            }
            _ => {}
        }

        frame.render_widget(Paragraph::new(hint_line(&[("r", "refresh")])), layout[4]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
