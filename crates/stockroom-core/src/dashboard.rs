// ── Dashboard & reports views ──
//
// Read-only summaries. Figures the backend computes (stock valuation,
// turnover, fast/slow movers) are fetched and shown, never recomputed here.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use stockroom_api::ApiClient;

use crate::error::CoreError;
use crate::model::{InventoryLog, InventoryReport, Product};
use crate::session::SessionStore;

/// How many low-stock products and recent logs the dashboard lists.
pub const DASHBOARD_PREVIEW: usize = 5;

const REPORTS_FALLBACK: &str = "Failed to load reports";
const DASHBOARD_FALLBACK: &str = "Failed to load dashboard";

/// Product counts by stock level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StockBreakdown {
    pub in_stock: usize,
    pub low_stock: usize,
    pub out_of_stock: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_products: usize,
    pub low_stock_count: usize,
    pub distinct_suppliers: usize,
    pub stock_valuation: Decimal,
    pub breakdown: StockBreakdown,
    pub low_stock: Vec<Product>,
    pub recent_logs: Vec<InventoryLog>,
}

impl DashboardSummary {
    /// Assemble the summary from already-fetched collections.
    pub fn build(
        products: &[Product],
        low_stock: Vec<Product>,
        logs: Vec<InventoryLog>,
        stats: &InventoryReport,
    ) -> Self {
        let distinct_suppliers = products
            .iter()
            .filter_map(|p| p.supplier.as_ref().map(|s| s.id))
            .collect::<HashSet<_>>()
            .len();

        let breakdown = products.iter().fold(StockBreakdown::default(), |mut acc, p| {
            if p.is_out_of_stock() {
                acc.out_of_stock += 1;
            } else if p.is_low_stock() {
                acc.low_stock += 1;
            } else {
                acc.in_stock += 1;
            }
            acc
        });

        Self {
            total_products: products.len(),
            low_stock_count: low_stock.len(),
            distinct_suppliers,
            stock_valuation: stats.stock_valuation,
            breakdown,
            low_stock: low_stock.into_iter().take(DASHBOARD_PREVIEW).collect(),
            recent_logs: logs.into_iter().take(DASHBOARD_PREVIEW).collect(),
        }
    }
}

/// A view that loaded or failed. Failures are display text, never errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewData<T> {
    Ready(T),
    Failed(String),
}

impl<T> ViewData<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(v) => Some(v),
            Self::Failed(_) => None,
        }
    }
}

/// Fetch products, low-stock products, logs, and stats concurrently.
pub async fn fetch_dashboard(api: &ApiClient) -> Result<DashboardSummary, CoreError> {
    let (products, low_stock, logs, stats) = tokio::join!(
        api.list_products(),
        api.list_low_stock(),
        api.list_logs(),
        api.inventory_stats(),
    );
    Ok(DashboardSummary::build(&products?, low_stock?, logs?, &stats?))
}

/// Dashboard load as a view: unauthorized expires the session, other
/// failures become a banner.
pub async fn load_dashboard(session: &SessionStore) -> ViewData<DashboardSummary> {
    match fetch_dashboard(session.api()).await {
        Ok(summary) => ViewData::Ready(summary),
        Err(e) => view_failure(session, &e, DASHBOARD_FALLBACK),
    }
}

/// Backend report figures.
pub async fn fetch_reports(api: &ApiClient) -> Result<InventoryReport, CoreError> {
    Ok(api.inventory_reports().await?)
}

pub async fn load_reports(session: &SessionStore) -> ViewData<InventoryReport> {
    match fetch_reports(session.api()).await {
        Ok(report) => ViewData::Ready(report),
        Err(e) => view_failure(session, &e, REPORTS_FALLBACK),
    }
}

fn view_failure<T>(session: &SessionStore, err: &CoreError, fallback: &str) -> ViewData<T> {
    if err.is_unauthorized() {
        session.expire();
    } else {
        warn!(error = %err, "view load failed");
    }
    ViewData::Failed(fallback.to_owned())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::SupplierRef;

    fn product(id: i64, quantity: i32, reorder: i32, supplier: Option<i64>) -> Product {
        Product {
            id,
            name: format!("P{id}"),
            description: None,
            category: None,
            supplier: supplier.map(|id| SupplierRef { id, name: None }),
            quantity,
            price: Decimal::ONE,
            warehouse_location: None,
            reorder_level: reorder,
        }
    }

    #[test]
    fn summary_counts_and_truncates() {
        let products: Vec<Product> = (1..=8)
            .map(|i| product(i, i32::try_from(i).unwrap_or(0), 6, Some(i % 3)))
            .collect();
        let low: Vec<Product> = products.iter().filter(|p| p.is_low_stock()).cloned().collect();
        let stats = InventoryReport {
            stock_valuation: Decimal::new(4200, 2),
            ..InventoryReport::default()
        };

        let summary = DashboardSummary::build(&products, low, Vec::new(), &stats);
        assert_eq!(summary.total_products, 8);
        assert_eq!(summary.low_stock_count, 6);
        assert_eq!(summary.low_stock.len(), DASHBOARD_PREVIEW);
        assert_eq!(summary.distinct_suppliers, 3);
        assert_eq!(summary.stock_valuation, Decimal::new(42, 0));
        assert_eq!(
            summary.breakdown,
            StockBreakdown {
                in_stock: 2,
                low_stock: 6,
                out_of_stock: 0
            }
        );
    }

    #[test]
    fn products_without_supplier_are_not_counted_as_one() {
        let products = vec![product(1, 5, 1, None), product(2, 5, 1, None)];
        let summary =
            DashboardSummary::build(&products, Vec::new(), Vec::new(), &InventoryReport::default());
        assert_eq!(summary.distinct_suppliers, 0);
        assert_eq!(summary.breakdown.in_stock, 2);
    }
}
