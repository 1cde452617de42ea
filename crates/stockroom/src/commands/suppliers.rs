//! Supplier command handlers.

use tabled::Tabled;

use stockroom_core::model::{Supplier, SupplierDraft};
use stockroom_core::{CoreError, Stockroom};

use crate::cli::{GlobalOpts, SupplierFields, SuppliersArgs, SuppliersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SupplierRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Contact")]
    contact: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Address")]
    address: String,
}

impl From<&Supplier> for SupplierRow {
    fn from(s: &Supplier) -> Self {
        Self {
            id: s.id,
            name: s.name.clone(),
            contact: util::or_dash(s.contact_info.as_deref()).into(),
            email: util::or_dash(s.email.as_deref()).into(),
            address: util::or_dash(s.address.as_deref()).into(),
        }
    }
}

fn detail(s: &Supplier) -> String {
    [
        format!("ID:       {}", s.id),
        format!("Name:     {}", s.name),
        format!("Contact:  {}", util::or_dash(s.contact_info.as_deref())),
        format!("Email:    {}", util::or_dash(s.email.as_deref())),
        format!("Address:  {}", util::or_dash(s.address.as_deref())),
    ]
    .join("\n")
}

fn apply_fields(draft: &mut SupplierDraft, fields: SupplierFields) {
    if let Some(name) = fields.name {
        draft.name = name;
    }
    if let Some(contact) = fields.contact {
        draft.contact_info = contact;
    }
    if let Some(email) = fields.supplier_email {
        draft.email = email;
    }
    if let Some(address) = fields.address {
        draft.address = address;
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    stockroom: &Stockroom,
    args: SuppliersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SuppliersCommand::List { filter } => {
            let suppliers = if filter.remote {
                let query = filter.search.unwrap_or_default();
                stockroom
                    .api()
                    .search_suppliers(&query)
                    .await
                    .map_err(|e| util::write_failure(stockroom, CoreError::from(e)))?
            } else {
                let controller = stockroom.suppliers();
                util::load_filtered(stockroom, &controller, filter.search).await?
            };

            let out = output::render_list(
                &global.output,
                &suppliers,
                |s| SupplierRow::from(s),
                |s| s.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SuppliersCommand::Get { id } => {
            let supplier = fetch(stockroom, id).await?;
            let out =
                output::render_single(&global.output, &supplier, detail, |s| s.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SuppliersCommand::Create(fields) => {
            let controller = stockroom.suppliers();
            let mut draft = SupplierDraft::default();
            apply_fields(&mut draft, fields);
            controller.set_form(draft);
            controller
                .submit()
                .await
                .map_err(|e| util::write_failure(stockroom, e))?;
            output::notice("Supplier created", global.quiet);
            Ok(())
        }

        SuppliersCommand::Update { id, fields } => {
            let supplier = fetch(stockroom, id).await?;
            let controller = stockroom.suppliers();
            controller.start_edit(&supplier);
            controller.update_form(|draft| apply_fields(draft, fields));
            controller
                .submit()
                .await
                .map_err(|e| util::write_failure(stockroom, e))?;
            output::notice(&format!("Supplier {id} updated"), global.quiet);
            Ok(())
        }

        SuppliersCommand::Delete { id } => {
            let controller = stockroom.suppliers();
            controller.request_delete(id);
            if !util::confirm("Delete this supplier?", global.yes)? {
                controller.cancel_delete();
                return Ok(());
            }
            controller
                .confirm_delete()
                .await
                .map_err(|e| util::label_not_found(e, "supplier", id, "suppliers list"))?;
            output::notice(&format!("Supplier {id} deleted"), global.quiet);
            Ok(())
        }
    }
}

async fn fetch(stockroom: &Stockroom, id: i64) -> Result<Supplier, CliError> {
    stockroom
        .api()
        .get_supplier(id)
        .await
        .map_err(|e| util::label_not_found(CoreError::from(e), "supplier", id, "suppliers list"))
}
