//! Product command handlers.

use std::str::FromStr;

use rust_decimal::Decimal;
use tabled::Tabled;

use stockroom_core::list_edit::filter;
use stockroom_core::model::{Product, ProductDraft};
use stockroom_core::resources::ProductResource;
use stockroom_core::{CoreError, Stockroom};

use crate::cli::{GlobalOpts, ProductFields, ProductsArgs, ProductsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Supplier")]
    supplier: String,
    #[tabled(rename = "Qty")]
    quantity: i32,
    #[tabled(rename = "Reorder")]
    reorder_level: i32,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Stock")]
    status: String,
}

impl ProductRow {
    fn new(p: &Product, color: bool) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            category: util::or_dash(p.category.as_deref()).into(),
            supplier: util::or_dash(p.supplier_name()).into(),
            quantity: p.quantity,
            reorder_level: p.reorder_level,
            price: format!("{:.2}", p.price),
            status: output::stock_status(p, color),
        }
    }
}

fn detail(p: &Product) -> String {
    [
        format!("ID:        {}", p.id),
        format!("Name:      {}", p.name),
        format!("Category:  {}", util::or_dash(p.category.as_deref())),
        format!("Supplier:  {}", util::or_dash(p.supplier_name())),
        format!("Quantity:  {}", p.quantity),
        format!("Reorder:   {}", p.reorder_level),
        format!("Price:     {:.2}", p.price),
        format!("Location:  {}", util::or_dash(p.warehouse_location.as_deref())),
        format!("Notes:     {}", util::or_dash(p.description.as_deref())),
    ]
    .join("\n")
}

// ── Form overrides ──────────────────────────────────────────────────

/// Apply the given flags over a draft, leaving unspecified fields alone.
fn apply_fields(draft: &mut ProductDraft, fields: ProductFields) -> Result<(), CliError> {
    if let Some(name) = fields.name {
        draft.name = name;
    }
    if let Some(description) = fields.description {
        draft.description = description;
    }
    if let Some(category) = fields.category {
        draft.category = category;
    }
    if fields.no_supplier {
        draft.supplier_id = None;
    } else if let Some(supplier) = fields.supplier {
        draft.supplier_id = Some(supplier);
    }
    if let Some(quantity) = fields.quantity {
        draft.quantity = quantity;
    }
    if let Some(ref price) = fields.price {
        draft.price = Decimal::from_str(price.trim()).map_err(|_| CliError::Validation {
            field: "price".into(),
            reason: format!("'{price}' is not a decimal number"),
        })?;
    }
    if let Some(location) = fields.location {
        draft.warehouse_location = location;
    }
    if let Some(reorder_level) = fields.reorder_level {
        draft.reorder_level = reorder_level;
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    stockroom: &Stockroom,
    args: ProductsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        ProductsCommand::List { filter: search, low_stock } => {
            let products = if low_stock {
                let items = stockroom
                    .api()
                    .list_low_stock()
                    .await
                    .map_err(|e| util::write_failure(stockroom, CoreError::from(e)))?;
                filter::<ProductResource>(&items, search.search.as_deref().unwrap_or_default())
            } else if search.remote {
                let query = search.search.unwrap_or_default();
                stockroom
                    .api()
                    .search_products(&query)
                    .await
                    .map_err(|e| util::write_failure(stockroom, CoreError::from(e)))?
            } else {
                let controller = stockroom.products();
                util::load_filtered(stockroom, &controller, search.search).await?
            };

            let out = output::render_list(
                &global.output,
                &products,
                |p| ProductRow::new(p, color),
                |p| p.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProductsCommand::Get { id } => {
            let product = fetch(stockroom, id).await?;
            let out = output::render_single(&global.output, &product, detail, |p| p.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProductsCommand::Create(fields) => {
            let controller = stockroom.products();
            let mut draft = ProductDraft::default();
            apply_fields(&mut draft, fields)?;
            controller.set_form(draft);
            controller
                .submit()
                .await
                .map_err(|e| util::write_failure(stockroom, e))?;
            output::notice("Product created", global.quiet);
            Ok(())
        }

        ProductsCommand::Update { id, fields } => {
            let product = fetch(stockroom, id).await?;
            let controller = stockroom.products();
            controller.start_edit(&product);

            let mut draft = controller.state().form;
            apply_fields(&mut draft, fields)?;
            controller.set_form(draft);
            controller
                .submit()
                .await
                .map_err(|e| util::write_failure(stockroom, e))?;
            output::notice(&format!("Product {id} updated"), global.quiet);
            Ok(())
        }

        ProductsCommand::Delete { id } => {
            let controller = stockroom.products();
            controller.request_delete(id);
            if !util::confirm("Delete this product?", global.yes)? {
                controller.cancel_delete();
                return Ok(());
            }
            controller.confirm_delete().await.map_err(|e| {
                util::label_not_found(e, "product", id, "products list")
            })?;
            output::notice(&format!("Product {id} deleted"), global.quiet);
            Ok(())
        }
    }
}

async fn fetch(stockroom: &Stockroom, id: i64) -> Result<Product, CliError> {
    stockroom
        .api()
        .get_product(id)
        .await
        .map_err(|e| util::label_not_found(CoreError::from(e), "product", id, "products list"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn fields() -> ProductFields {
        ProductFields {
            name: None,
            description: None,
            category: None,
            supplier: None,
            no_supplier: false,
            quantity: None,
            price: None,
            location: None,
            reorder_level: None,
        }
    }

    #[test]
    fn only_given_fields_change() {
        let mut draft = ProductDraft {
            name: "Widget".into(),
            category: "Tools".into(),
            supplier_id: Some(3),
            quantity: 10,
            ..ProductDraft::default()
        };
        let overrides = ProductFields {
            quantity: Some(4),
            price: Some("12.50".into()),
            ..fields()
        };
        apply_fields(&mut draft, overrides).unwrap();

        assert_eq!(draft.name, "Widget");
        assert_eq!(draft.category, "Tools");
        assert_eq!(draft.supplier_id, Some(3));
        assert_eq!(draft.quantity, 4);
        assert_eq!(draft.price, Decimal::new(1250, 2));
    }

    #[test]
    fn no_supplier_clears_the_reference() {
        let mut draft = ProductDraft {
            supplier_id: Some(3),
            ..ProductDraft::default()
        };
        apply_fields(
            &mut draft,
            ProductFields {
                no_supplier: true,
                ..fields()
            },
        )
        .unwrap();
        assert_eq!(draft.supplier_id, None);
    }

    #[test]
    fn bad_price_is_a_usage_error() {
        let mut draft = ProductDraft::default();
        let err = apply_fields(
            &mut draft,
            ProductFields {
                price: Some("twelve".into()),
                ..fields()
            },
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "price"));
    }
}
