// Inventory endpoints
//
// Stock movements are append-only. `update-stock` is a command: besides
// writing a log entry it changes the product's quantity on the server.

use tracing::debug;
use url::Url;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{InventoryLog, InventoryReport, LogPayload, StockUpdate};

const CSV_EXPORT_PATH: &str = "inventory/reports/export/csv";

impl ApiClient {
    /// `GET /inventory/logs`
    pub async fn list_logs(&self) -> Result<Vec<InventoryLog>, Error> {
        self.get("inventory/logs").await
    }

    /// `POST /inventory/logs`
    pub async fn create_log(&self, payload: &LogPayload) -> Result<InventoryLog, Error> {
        debug!(product = payload.product.id, "creating inventory log");
        self.post("inventory/logs", payload).await
    }

    /// Record a stock movement and adjust the product's quantity.
    ///
    /// `POST /inventory/update-stock`. The backend rejects an `OUT` larger
    /// than the on-hand quantity with `"Insufficient stock"`.
    pub async fn update_stock(&self, update: &StockUpdate) -> Result<InventoryLog, Error> {
        debug!(
            product = update.product_id,
            quantity = update.quantity,
            movement = %update.movement,
            "updating stock"
        );
        self.post("inventory/update-stock", update).await
    }

    /// `GET /inventory/stats`
    pub async fn inventory_stats(&self) -> Result<InventoryReport, Error> {
        self.get("inventory/stats").await
    }

    /// `GET /inventory/reports`
    pub async fn inventory_reports(&self) -> Result<InventoryReport, Error> {
        self.get("inventory/reports").await
    }

    /// Direct link to the CSV export, for opening in a browser.
    pub fn csv_export_url(&self) -> Result<Url, Error> {
        self.url(CSV_EXPORT_PATH)
    }

    /// Fetch the CSV export through this session's cookies.
    ///
    /// `GET /inventory/reports/export/csv`. Bytes are passed through
    /// untouched; the backend owns the format.
    pub async fn download_csv(&self) -> Result<Vec<u8>, Error> {
        debug!("downloading inventory CSV export");
        self.get_bytes(CSV_EXPORT_PATH).await
    }
}
