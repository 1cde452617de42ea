//! Products screen: catalog table with stock-level coloring.

use ratatui::layout::Constraint;
use ratatui::style::Style;
use ratatui::widgets::{Cell, Row};

use stockroom_core::Route;
use stockroom_core::model::{Product, ProductDraft, Supplier};
use stockroom_core::resources::ProductResource;

use crate::screens::list::ListView;
use crate::theme;
use crate::widgets::form::{Choice, Field, Form};

const NAME: usize = 0;
const DESCRIPTION: usize = 1;
const CATEGORY: usize = 2;
const SUPPLIER: usize = 3;
const QUANTITY: usize = 4;
const PRICE: usize = 5;
const LOCATION: usize = 6;
const REORDER: usize = 7;

impl ListView for ProductResource {
    const ROUTE: Route = Route::Products;
    const NOUN: &'static str = "product";

    fn columns() -> Vec<(&'static str, Constraint)> {
        vec![
            ("Name", Constraint::Fill(2)),
            ("Category", Constraint::Fill(1)),
            ("Supplier", Constraint::Fill(1)),
            ("Qty", Constraint::Length(6)),
            ("Reorder", Constraint::Length(8)),
            ("Price", Constraint::Length(10)),
            ("Location", Constraint::Length(10)),
        ]
    }

    fn row(p: &Product) -> Row<'static> {
        Row::new(vec![
            Cell::from(p.name.clone()),
            Cell::from(p.category.clone().unwrap_or_default()),
            Cell::from(p.supplier_name().unwrap_or("-").to_owned()),
            Cell::from(p.quantity.to_string()).style(Style::default().fg(theme::stock_color(p))),
            Cell::from(p.reorder_level.to_string()),
            Cell::from(format!("${:.2}", p.price)),
            Cell::from(p.warehouse_location.clone().unwrap_or_default()),
        ])
    }

    fn form(draft: &ProductDraft, suppliers: &Vec<Supplier>) -> Form {
        let mut choices = vec![Choice {
            id: None,
            label: "(none)".into(),
        }];
        choices.extend(suppliers.iter().map(|s| Choice {
            id: Some(s.id),
            label: s.name.clone(),
        }));

        Form::new(vec![
            Field::text("Name", draft.name.clone()),
            Field::text("Description", draft.description.clone()),
            Field::text("Category", draft.category.clone()),
            Field::picker("Supplier", choices, draft.supplier_id),
            Field::number("Quantity", draft.quantity),
            Field::number("Price", draft.price),
            Field::text("Location", draft.warehouse_location.clone()),
            Field::number("Reorder level", draft.reorder_level),
        ])
    }

    fn read_form(form: &Form) -> Result<ProductDraft, String> {
        Ok(ProductDraft {
            name: form.text(NAME).to_owned(),
            description: form.text(DESCRIPTION).to_owned(),
            category: form.text(CATEGORY).to_owned(),
            supplier_id: form.picked(SUPPLIER),
            quantity: form.integer(QUANTITY)?,
            price: form.decimal(PRICE)?,
            warehouse_location: form.text(LOCATION).to_owned(),
            reorder_level: form.integer(REORDER)?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    use super::*;

    fn supplier(id: i64, name: &str) -> Supplier {
        Supplier {
            id,
            name: name.into(),
            contact_info: None,
            email: None,
            address: None,
        }
    }

    #[test]
    fn form_reads_back_the_draft_it_was_built_from() {
        let draft = ProductDraft {
            name: "Bolt".into(),
            description: "M6".into(),
            category: "Hardware".into(),
            supplier_id: Some(9),
            quantity: 40,
            price: Decimal::new(1999, 2),
            warehouse_location: "A-3".into(),
            reorder_level: 10,
        };
        let form = ProductResource::form(&draft, &vec![supplier(4, "Acme"), supplier(9, "Globex")]);
        assert_eq!(ProductResource::read_form(&form).unwrap(), draft);
    }

    #[test]
    fn create_form_starts_without_a_supplier() {
        let form = ProductResource::form(&ProductDraft::default(), &vec![supplier(4, "Acme")]);
        let draft = ProductResource::read_form(&form).unwrap();
        assert_eq!(draft.supplier_id, None);
        assert_eq!(draft.quantity, 0);
    }
}
