//! Inventory log command handlers.

use tabled::Tabled;

use stockroom_core::Stockroom;
use stockroom_core::model::{InventoryLog, MovementType, StockDraft};

use crate::cli::{GlobalOpts, LogsArgs, LogsCommand, MovementArg};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct LogRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "When")]
    when: String,
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Type")]
    movement: String,
    #[tabled(rename = "Qty")]
    quantity: i32,
    #[tabled(rename = "Notes")]
    notes: String,
}

impl From<&InventoryLog> for LogRow {
    fn from(log: &InventoryLog) -> Self {
        Self {
            id: log.id,
            when: log
                .created_at
                .map_or_else(|| "-".into(), |t| t.format("%Y-%m-%d %H:%M").to_string()),
            product: util::or_dash(log.product_name()).into(),
            movement: log.movement.to_string(),
            quantity: log.quantity,
            notes: util::or_dash(log.notes.as_deref()).into(),
        }
    }
}

impl From<MovementArg> for MovementType {
    fn from(arg: MovementArg) -> Self {
        match arg {
            MovementArg::In => MovementType::In,
            MovementArg::Out => MovementType::Out,
        }
    }
}

pub async fn handle(
    stockroom: &Stockroom,
    args: LogsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        LogsCommand::List { search } => {
            let controller = stockroom.inventory_logs();
            let logs = util::load_filtered(stockroom, &controller, search).await?;
            let out = output::render_list(
                &global.output,
                &logs,
                |l| LogRow::from(l),
                |l| l.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LogsCommand::Stock {
            product_id,
            movement,
            quantity,
            notes,
        } => {
            let controller = stockroom.inventory_logs();
            controller.set_form(StockDraft {
                product_id: Some(product_id),
                movement: movement.into(),
                quantity,
                notes: notes.unwrap_or_default(),
            });
            controller
                .submit()
                .await
                .map_err(|e| util::write_failure(stockroom, e))?;

            // The reload after submit refreshed the product lookups too.
            let state = controller.state();
            let message = match state.lookups.iter().find(|p| p.id == product_id) {
                Some(p) => format!("Stock updated: {} now has {} on hand", p.name, p.quantity),
                None => "Stock updated".to_owned(),
            };
            output::notice(&message, global.quiet);
            Ok(())
        }

        LogsCommand::Record {
            product_id,
            movement,
            quantity,
            notes,
        } => {
            let draft = StockDraft {
                product_id: Some(product_id),
                movement: movement.into(),
                quantity,
                notes: notes.unwrap_or_default(),
            };
            let log = stockroom
                .record_log(&draft)
                .await
                .map_err(|e| util::write_failure(stockroom, e))?;
            output::notice(
                &format!(
                    "Logged {} {} for product {product_id} (entry {})",
                    log.movement, log.quantity, log.id
                ),
                global.quiet,
            );
            Ok(())
        }
    }
}
