//! Dashboard overview handler.

use stockroom_core::Stockroom;
use stockroom_core::dashboard::DashboardSummary;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

fn detail(d: &DashboardSummary) -> String {
    let mut lines = vec![
        format!("Products:        {}", d.total_products),
        format!("Low stock:       {}", d.low_stock_count),
        format!("Suppliers:       {}", d.distinct_suppliers),
        format!("Stock value:     {:.2}", d.stock_valuation),
        format!(
            "Stock levels:    {} ok / {} low / {} out",
            d.breakdown.in_stock, d.breakdown.low_stock, d.breakdown.out_of_stock
        ),
    ];

    if !d.low_stock.is_empty() {
        lines.push(String::new());
        lines.push("Low stock:".into());
        for p in &d.low_stock {
            lines.push(format!(
                "  {:<28} {:>5} (reorder at {})",
                p.name, p.quantity, p.reorder_level
            ));
        }
    }

    if !d.recent_logs.is_empty() {
        lines.push(String::new());
        lines.push("Recent movements:".into());
        for log in &d.recent_logs {
            lines.push(format!(
                "  {:<3} {:>5}  {}",
                log.movement.to_string(),
                log.quantity,
                util::or_dash(log.product_name())
            ));
        }
    }

    lines.join("\n")
}

pub async fn handle(stockroom: &Stockroom, global: &GlobalOpts) -> Result<(), CliError> {
    let summary = stockroom.dashboard().await?;
    let out = output::render_single(&global.output, &summary, detail, |d| {
        d.total_products.to_string()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
