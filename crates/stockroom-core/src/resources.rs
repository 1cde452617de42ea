// ── Resource bindings ──
//
// `Resource` implementations for the three list pages. Each one is a thin
// adapter from the list-edit capability set onto the api client.

use stockroom_api::ApiClient;
use stockroom_api::models::LogPayload;

use crate::error::CoreError;
use crate::list_edit::Resource;
use crate::model::{
    EntityId, IdRef, InventoryLog, Product, ProductDraft, StockDraft, Supplier, SupplierDraft,
};

fn opt(value: Option<&str>) -> String {
    value.unwrap_or_default().to_owned()
}

// ── Products ─────────────────────────────────────────────────────

/// Products, with the supplier list as the form's lookup.
#[derive(Debug, Clone)]
pub struct ProductResource {
    api: ApiClient,
}

impl ProductResource {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl Resource for ProductResource {
    type Entity = Product;
    type Draft = ProductDraft;
    type Lookups = Vec<Supplier>;

    const LOAD_FALLBACK: &'static str = "Failed to load products";

    fn id(entity: &Product) -> EntityId {
        entity.id
    }

    fn search_fields(p: &Product) -> Vec<String> {
        vec![
            p.name.clone(),
            opt(p.category.as_deref()),
            opt(p.supplier_name()),
        ]
    }

    fn draft_of(entity: &Product) -> ProductDraft {
        ProductDraft::from(entity)
    }

    fn validate(draft: &ProductDraft) -> Result<(), CoreError> {
        draft.validate()
    }

    async fn list(&self) -> Result<Vec<Product>, CoreError> {
        Ok(self.api.list_products().await?)
    }

    async fn lookups(&self) -> Result<Vec<Supplier>, CoreError> {
        Ok(self.api.list_suppliers().await?)
    }

    async fn create(&self, draft: &ProductDraft) -> Result<(), CoreError> {
        self.api.create_product(&draft.to_payload()).await?;
        Ok(())
    }

    async fn update(&self, id: EntityId, draft: &ProductDraft) -> Result<(), CoreError> {
        self.api.update_product(id, &draft.to_payload()).await?;
        Ok(())
    }

    async fn delete(&self, id: EntityId) -> Result<(), CoreError> {
        Ok(self.api.delete_product(id).await?)
    }
}

// ── Suppliers ────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SupplierResource {
    api: ApiClient,
}

impl SupplierResource {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl Resource for SupplierResource {
    type Entity = Supplier;
    type Draft = SupplierDraft;
    type Lookups = ();

    const LOAD_FALLBACK: &'static str = "Failed to load suppliers";

    fn id(entity: &Supplier) -> EntityId {
        entity.id
    }

    fn search_fields(s: &Supplier) -> Vec<String> {
        vec![
            s.name.clone(),
            opt(s.email.as_deref()),
            opt(s.address.as_deref()),
        ]
    }

    fn draft_of(entity: &Supplier) -> SupplierDraft {
        SupplierDraft::from(entity)
    }

    fn validate(draft: &SupplierDraft) -> Result<(), CoreError> {
        draft.validate()
    }

    async fn list(&self) -> Result<Vec<Supplier>, CoreError> {
        Ok(self.api.list_suppliers().await?)
    }

    async fn create(&self, draft: &SupplierDraft) -> Result<(), CoreError> {
        self.api.create_supplier(&draft.to_payload()).await?;
        Ok(())
    }

    async fn update(&self, id: EntityId, draft: &SupplierDraft) -> Result<(), CoreError> {
        self.api.update_supplier(id, &draft.to_payload()).await?;
        Ok(())
    }

    async fn delete(&self, id: EntityId) -> Result<(), CoreError> {
        Ok(self.api.delete_supplier(id).await?)
    }
}

// ── Inventory logs ───────────────────────────────────────────────

/// Append-only stock movements.
///
/// Submitting the form runs the `update-stock` command, which also moves
/// the product's quantity on the server. Logs are never edited or deleted.
#[derive(Debug, Clone)]
pub struct InventoryLogResource {
    api: ApiClient,
}

impl InventoryLogResource {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Write a bare log entry without touching product quantities.
    ///
    /// `POST /inventory/logs`. The list page never uses this; stock changes
    /// go through `update-stock`. See [`Stockroom::record_log`].
    ///
    /// [`Stockroom::record_log`]: crate::Stockroom::record_log
    pub async fn record_entry(&self, draft: &StockDraft) -> Result<InventoryLog, CoreError> {
        draft.validate()?;
        let update = draft.to_update()?;
        let payload = LogPayload {
            product: IdRef {
                id: update.product_id,
            },
            movement: update.movement,
            quantity: update.quantity,
            notes: update.notes,
        };
        Ok(self.api.create_log(&payload).await?)
    }
}

impl Resource for InventoryLogResource {
    type Entity = InventoryLog;
    type Draft = StockDraft;
    type Lookups = Vec<Product>;

    const LOAD_FALLBACK: &'static str = "Failed to load inventory logs";
    const SAVE_FALLBACK: &'static str = "Failed to update stock";

    fn id(entity: &InventoryLog) -> EntityId {
        entity.id
    }

    fn search_fields(log: &InventoryLog) -> Vec<String> {
        vec![
            opt(log.product_name()),
            log.movement.to_string(),
            log.quantity.to_string(),
        ]
    }

    fn draft_of(entity: &InventoryLog) -> StockDraft {
        StockDraft::from(entity)
    }

    fn validate(draft: &StockDraft) -> Result<(), CoreError> {
        draft.validate()
    }

    async fn list(&self) -> Result<Vec<InventoryLog>, CoreError> {
        Ok(self.api.list_logs().await?)
    }

    async fn lookups(&self) -> Result<Vec<Product>, CoreError> {
        Ok(self.api.list_products().await?)
    }

    async fn create(&self, draft: &StockDraft) -> Result<(), CoreError> {
        self.api.update_stock(&draft.to_update()?).await?;
        Ok(())
    }

    async fn update(&self, _id: EntityId, _draft: &StockDraft) -> Result<(), CoreError> {
        Err(CoreError::Unsupported {
            operation: "editing an inventory log".into(),
        })
    }

    async fn delete(&self, _id: EntityId) -> Result<(), CoreError> {
        Err(CoreError::Unsupported {
            operation: "deleting an inventory log".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    use super::*;
    use crate::list_edit::filter;
    use crate::model::{MovementType, ProductRef, SupplierRef};

    fn product(id: i64, name: &str, category: &str, supplier: Option<&str>) -> Product {
        Product {
            id,
            name: name.into(),
            description: None,
            category: Some(category.into()),
            supplier: supplier.map(|n| SupplierRef {
                id: 1,
                name: Some(n.into()),
            }),
            quantity: 1,
            price: Decimal::ONE,
            warehouse_location: None,
            reorder_level: 0,
        }
    }

    fn ids<T>(items: &[T], id: impl Fn(&T) -> i64) -> Vec<i64> {
        items.iter().map(id).collect()
    }

    #[test]
    fn product_filter_covers_name_category_supplier() {
        let items = vec![
            product(1, "Bolt", "Hardware", Some("Acme")),
            product(2, "Paint", "Finishes", None),
            product(3, "Drill", "Tools", Some("ACME Tools")),
        ];
        assert_eq!(ids(&filter::<ProductResource>(&items, "acme"), |p| p.id), vec![1, 3]);
        assert_eq!(ids(&filter::<ProductResource>(&items, "FIN"), |p| p.id), vec![2]);
        assert_eq!(ids(&filter::<ProductResource>(&items, ""), |p| p.id), vec![1, 2, 3]);
        assert!(filter::<ProductResource>(&items, "zzz").is_empty());
    }

    #[test]
    fn supplier_filter_ignores_contact_info() {
        let items = vec![Supplier {
            id: 5,
            name: "Acme".into(),
            contact_info: Some("Jane Doe".into()),
            email: Some("sales@acme.test".into()),
            address: Some("1 Harbour Rd".into()),
        }];
        assert_eq!(filter::<SupplierResource>(&items, "harbour").len(), 1);
        assert_eq!(filter::<SupplierResource>(&items, "SALES@").len(), 1);
        assert!(filter::<SupplierResource>(&items, "jane").is_empty());
    }

    #[test]
    fn log_filter_matches_type_and_quantity() {
        let items = vec![
            InventoryLog {
                id: 1,
                product: Some(ProductRef {
                    id: 1,
                    name: Some("Bolt".into()),
                    quantity: None,
                }),
                movement: MovementType::In,
                quantity: 25,
                notes: None,
                created_at: None,
            },
            InventoryLog {
                id: 2,
                product: None,
                movement: MovementType::Out,
                quantity: 3,
                notes: None,
                created_at: None,
            },
        ];
        assert_eq!(ids(&filter::<InventoryLogResource>(&items, "out"), |l| l.id), vec![2]);
        assert_eq!(ids(&filter::<InventoryLogResource>(&items, "25"), |l| l.id), vec![1]);
        assert_eq!(ids(&filter::<InventoryLogResource>(&items, "bol"), |l| l.id), vec![1]);
    }
}
