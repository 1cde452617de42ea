//! Suppliers screen.

use ratatui::layout::Constraint;
use ratatui::widgets::{Cell, Row};

use stockroom_core::Route;
use stockroom_core::model::{Supplier, SupplierDraft};
use stockroom_core::resources::SupplierResource;

use crate::screens::list::ListView;
use crate::widgets::form::{Field, Form};

impl ListView for SupplierResource {
    const ROUTE: Route = Route::Suppliers;
    const NOUN: &'static str = "supplier";

    fn columns() -> Vec<(&'static str, Constraint)> {
        vec![
            ("Name", Constraint::Fill(2)),
            ("Contact", Constraint::Fill(1)),
            ("Email", Constraint::Fill(2)),
            ("Address", Constraint::Fill(2)),
        ]
    }

    fn row(s: &Supplier) -> Row<'static> {
        Row::new(vec![
            Cell::from(s.name.clone()),
            Cell::from(s.contact_info.clone().unwrap_or_default()),
            Cell::from(s.email.clone().unwrap_or_default()),
            Cell::from(s.address.clone().unwrap_or_default()),
        ])
    }

    fn form(draft: &SupplierDraft, _lookups: &()) -> Form {
        Form::new(vec![
            Field::text("Name", draft.name.clone()),
            Field::text("Contact", draft.contact_info.clone()),
            Field::text("Email", draft.email.clone()),
            Field::text("Address", draft.address.clone()),
        ])
    }

    fn read_form(form: &Form) -> Result<SupplierDraft, String> {
        Ok(SupplierDraft {
            name: form.text(0).to_owned(),
            contact_info: form.text(1).to_owned(),
            email: form.text(2).to_owned(),
            address: form.text(3).to_owned(),
        })
    }
}
