//! Inventory logs screen. The form records a stock movement; existing
//! entries are read-only.

use ratatui::layout::Constraint;
use ratatui::style::Style;
use ratatui::widgets::{Cell, Row};

use stockroom_core::Route;
use stockroom_core::model::{InventoryLog, MovementType, Product, StockDraft};
use stockroom_core::resources::InventoryLogResource;

use crate::screens::list::ListView;
use crate::theme;
use crate::widgets::form::{Choice, Field, Form};

const PRODUCT: usize = 0;
const MOVEMENT: usize = 1;
const QUANTITY: usize = 2;
const NOTES: usize = 3;

const MOVEMENT_IN: i64 = 0;
const MOVEMENT_OUT: i64 = 1;

impl ListView for InventoryLogResource {
    const ROUTE: Route = Route::InventoryLogs;
    const NOUN: &'static str = "stock movement";
    const EDITABLE: bool = false;

    fn columns() -> Vec<(&'static str, Constraint)> {
        vec![
            ("When", Constraint::Length(17)),
            ("Product", Constraint::Fill(2)),
            ("Type", Constraint::Length(5)),
            ("Qty", Constraint::Length(6)),
            ("Notes", Constraint::Fill(2)),
        ]
    }

    fn row(log: &InventoryLog) -> Row<'static> {
        let movement_color = match log.movement {
            MovementType::In => theme::SUCCESS_GREEN,
            MovementType::Out => theme::AMBER,
        };
        Row::new(vec![
            Cell::from(
                log.created_at
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default(),
            ),
            Cell::from(log.product_name().unwrap_or("-").to_owned()),
            Cell::from(log.movement.to_string()).style(Style::default().fg(movement_color)),
            Cell::from(log.quantity.to_string()),
            Cell::from(log.notes.clone().unwrap_or_default()),
        ])
    }

    fn create_title() -> String {
        "Update stock".into()
    }

    fn form(draft: &StockDraft, products: &Vec<Product>) -> Form {
        let mut choices = vec![Choice {
            id: None,
            label: "(select a product)".into(),
        }];
        choices.extend(products.iter().map(|p| Choice {
            id: Some(p.id),
            label: format!("{} ({} on hand)", p.name, p.quantity),
        }));

        let movements = vec![
            Choice {
                id: Some(MOVEMENT_IN),
                label: MovementType::In.to_string(),
            },
            Choice {
                id: Some(MOVEMENT_OUT),
                label: MovementType::Out.to_string(),
            },
        ];
        let current_movement = match draft.movement {
            MovementType::In => MOVEMENT_IN,
            MovementType::Out => MOVEMENT_OUT,
        };

        Form::new(vec![
            Field::picker("Product", choices, draft.product_id),
            Field::picker("Type", movements, Some(current_movement)),
            Field::number("Quantity", draft.quantity),
            Field::text("Notes", draft.notes.clone()),
        ])
    }

    fn read_form(form: &Form) -> Result<StockDraft, String> {
        let movement = if form.picked(MOVEMENT) == Some(MOVEMENT_OUT) {
            MovementType::Out
        } else {
            MovementType::In
        };
        Ok(StockDraft {
            product_id: form.picked(PRODUCT),
            movement,
            quantity: form.integer(QUANTITY)?,
            notes: form.text(NOTES).to_owned(),
        })
    }
}
