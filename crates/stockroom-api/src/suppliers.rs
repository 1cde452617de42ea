// Supplier endpoints

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Supplier, SupplierId, SupplierPayload};

impl ApiClient {
    /// `GET /suppliers`
    pub async fn list_suppliers(&self) -> Result<Vec<Supplier>, Error> {
        self.get("suppliers").await
    }

    /// `GET /suppliers/{id}`
    pub async fn get_supplier(&self, id: SupplierId) -> Result<Supplier, Error> {
        self.get(&format!("suppliers/{id}")).await
    }

    /// `POST /suppliers`
    pub async fn create_supplier(&self, payload: &SupplierPayload) -> Result<Supplier, Error> {
        debug!(name = %payload.name, "creating supplier");
        self.post("suppliers", payload).await
    }

    /// `PUT /suppliers/{id}`
    pub async fn update_supplier(
        &self,
        id: SupplierId,
        payload: &SupplierPayload,
    ) -> Result<Supplier, Error> {
        debug!(id, "updating supplier");
        self.put(&format!("suppliers/{id}"), payload).await
    }

    /// `DELETE /suppliers/{id}`
    pub async fn delete_supplier(&self, id: SupplierId) -> Result<(), Error> {
        debug!(id, "deleting supplier");
        self.delete(&format!("suppliers/{id}")).await
    }

    /// `GET /suppliers/search?q=`
    pub async fn search_suppliers(&self, query: &str) -> Result<Vec<Supplier>, Error> {
        self.get_with_query("suppliers/search", &[("q", query)]).await
    }
}
