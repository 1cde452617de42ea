// Product endpoints

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Product, ProductId, ProductPayload};

impl ApiClient {
    /// `GET /products`
    pub async fn list_products(&self) -> Result<Vec<Product>, Error> {
        self.get("products").await
    }

    /// `GET /products/{id}`
    pub async fn get_product(&self, id: ProductId) -> Result<Product, Error> {
        self.get(&format!("products/{id}")).await
    }

    /// `POST /products`
    pub async fn create_product(&self, payload: &ProductPayload) -> Result<Product, Error> {
        debug!(name = %payload.name, "creating product");
        self.post("products", payload).await
    }

    /// `PUT /products/{id}`
    pub async fn update_product(
        &self,
        id: ProductId,
        payload: &ProductPayload,
    ) -> Result<Product, Error> {
        debug!(id, "updating product");
        self.put(&format!("products/{id}"), payload).await
    }

    /// `DELETE /products/{id}`
    pub async fn delete_product(&self, id: ProductId) -> Result<(), Error> {
        debug!(id, "deleting product");
        self.delete(&format!("products/{id}")).await
    }

    /// Products at or below their reorder level.
    ///
    /// `GET /products/low-stock`
    pub async fn list_low_stock(&self) -> Result<Vec<Product>, Error> {
        self.get("products/low-stock").await
    }

    /// Server-side name search.
    ///
    /// `GET /products/search?q=`
    pub async fn search_products(&self, query: &str) -> Result<Vec<Product>, Error> {
        self.get_with_query("products/search", &[("q", query)]).await
    }
}
