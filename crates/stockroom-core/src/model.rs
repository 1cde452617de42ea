// ── Domain model ──
//
// Entities come straight from the wire types in `stockroom-api`. This module
// adds the editable drafts the list-edit controllers hold in their forms,
// and the conversions from entity to draft and draft to request payload.

use rust_decimal::Decimal;

use crate::error::CoreError;

pub use stockroom_api::models::{
    IdRef, InventoryLog, InventoryReport, LogId, MovementType, Product, ProductId, ProductPayload,
    ProductRef, Role, StockUpdate, Supplier, SupplierId, SupplierPayload, SupplierRef, User,
    UserId,
};

/// Numeric identity shared by every backend entity.
pub type EntityId = i64;

// ── Product ──────────────────────────────────────────────────────────

/// Editable product fields. `Default` is the empty create form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub category: String,
    pub supplier_id: Option<SupplierId>,
    pub quantity: i32,
    pub price: Decimal,
    pub warehouse_location: String,
    pub reorder_level: i32,
}

impl ProductDraft {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::validation("Product name is required"));
        }
        if self.quantity < 0 {
            return Err(CoreError::validation("Quantity cannot be negative"));
        }
        if self.reorder_level < 0 {
            return Err(CoreError::validation("Reorder level cannot be negative"));
        }
        if self.price < Decimal::ZERO {
            return Err(CoreError::validation("Price cannot be negative"));
        }
        Ok(())
    }

    /// Wire payload. The supplier travels as `{id}` or `null`, never nested.
    pub fn to_payload(&self) -> ProductPayload {
        ProductPayload {
            name: self.name.trim().to_owned(),
            description: self.description.clone(),
            category: self.category.clone(),
            quantity: self.quantity,
            price: self.price,
            warehouse_location: self.warehouse_location.clone(),
            reorder_level: self.reorder_level,
            supplier: self.supplier_id.map(|id| IdRef { id }),
        }
    }
}

impl From<&Product> for ProductDraft {
    fn from(p: &Product) -> Self {
        Self {
            name: p.name.clone(),
            description: p.description.clone().unwrap_or_default(),
            category: p.category.clone().unwrap_or_default(),
            supplier_id: p.supplier.as_ref().map(|s| s.id),
            quantity: p.quantity,
            price: p.price,
            warehouse_location: p.warehouse_location.clone().unwrap_or_default(),
            reorder_level: p.reorder_level,
        }
    }
}

// ── Supplier ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupplierDraft {
    pub name: String,
    pub contact_info: String,
    pub email: String,
    pub address: String,
}

impl SupplierDraft {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::validation("Supplier name is required"));
        }
        Ok(())
    }

    pub fn to_payload(&self) -> SupplierPayload {
        SupplierPayload {
            name: self.name.trim().to_owned(),
            contact_info: self.contact_info.clone(),
            email: self.email.trim().to_owned(),
            address: self.address.clone(),
        }
    }
}

impl From<&Supplier> for SupplierDraft {
    fn from(s: &Supplier) -> Self {
        Self {
            name: s.name.clone(),
            contact_info: s.contact_info.clone().unwrap_or_default(),
            email: s.email.clone().unwrap_or_default(),
            address: s.address.clone().unwrap_or_default(),
        }
    }
}

// ── Stock movement ───────────────────────────────────────────────────

/// The inventory-log form: one stock movement against one product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockDraft {
    pub product_id: Option<ProductId>,
    pub movement: MovementType,
    pub quantity: i32,
    pub notes: String,
}

impl StockDraft {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.product_id.is_none() {
            return Err(CoreError::validation("Select a product"));
        }
        if self.quantity <= 0 {
            return Err(CoreError::validation("Quantity must be greater than zero"));
        }
        Ok(())
    }

    /// Command body for `update-stock`. Blank notes are sent as `null`.
    pub fn to_update(&self) -> Result<StockUpdate, CoreError> {
        let product_id = self
            .product_id
            .ok_or_else(|| CoreError::validation("Select a product"))?;
        let notes = self.notes.trim();
        Ok(StockUpdate {
            product_id,
            quantity: self.quantity,
            movement: self.movement,
            notes: (!notes.is_empty()).then(|| notes.to_owned()),
        })
    }
}

impl From<&InventoryLog> for StockDraft {
    fn from(log: &InventoryLog) -> Self {
        Self {
            product_id: log.product.as_ref().map(|p| p.id),
            movement: log.movement,
            quantity: log.quantity,
            notes: log.notes.clone().unwrap_or_default(),
        }
    }
}
