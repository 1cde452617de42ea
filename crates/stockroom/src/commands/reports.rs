//! Report and CSV export handlers (administrators only).

use std::io::Write;

use tabled::Tabled;

use stockroom_core::Stockroom;
use stockroom_core::model::{InventoryReport, Product};

use crate::cli::{GlobalOpts, ReportsArgs, ReportsCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct MoverRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Product")]
    name: String,
    #[tabled(rename = "Qty")]
    quantity: i32,
}

impl From<&Product> for MoverRow {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            quantity: p.quantity,
        }
    }
}

fn detail(report: &InventoryReport) -> String {
    let movers = |products: &[Product]| {
        if products.is_empty() {
            "  (none)".to_owned()
        } else {
            let rows: Vec<MoverRow> = products.iter().map(MoverRow::from).collect();
            output::render_table(&rows)
        }
    };
    [
        format!("Stock valuation:  {:.2}", report.stock_valuation),
        format!("Turnover rate:    {:.1}", report.turnover_rate),
        String::new(),
        "Fast moving:".to_owned(),
        movers(&report.fast_moving),
        String::new(),
        "Slow moving:".to_owned(),
        movers(&report.slow_moving),
    ]
    .join("\n")
}

pub async fn handle(
    stockroom: &Stockroom,
    args: ReportsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ReportsCommand::Show => {
            let report = stockroom.reports().await?;
            let out = output::render_single(&global.output, &report, detail, |r| {
                r.stock_valuation.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ReportsCommand::Export { file } => {
            let csv = stockroom.export_csv().await?;
            match file {
                Some(path) => {
                    std::fs::write(&path, &csv)?;
                    output::notice(
                        &format!("Wrote {} bytes to {}", csv.len(), path.display()),
                        global.quiet,
                    );
                }
                None => {
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(&csv)?;
                    stdout.flush()?;
                }
            }
            Ok(())
        }
    }
}
