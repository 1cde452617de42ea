// Wire types for the inventory REST API
//
// Field names follow the backend's camelCase JSON. Optional text fields use
// `#[serde(default)]` because the backend emits `null` for anything a user
// left blank.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub type UserId = i64;
pub type ProductId = i64;
pub type SupplierId = i64;
pub type LogId = i64;

// ── Users ────────────────────────────────────────────────────────────

/// Account role. Closed set; anything else is a deserialization error.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Role {
    Admin,
    #[default]
    Staff,
}

impl Role {
    /// Reports (and the reports nav entry) are admin-only.
    pub fn can_view_reports(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// Snapshot of the logged-in user, as returned by `/auth/me` and `/auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl User {
    /// Up to two uppercase initials from the display name.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

// ── Suppliers ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: SupplierId,
    pub name: String,
    #[serde(default)]
    pub contact_info: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// The supplier nested inside a product. The backend sends the whole
/// supplier; only the identity and name matter to a product view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierRef {
    pub id: SupplierId,
    #[serde(default)]
    pub name: Option<String>,
}

// ── Products ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub supplier: Option<SupplierRef>,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub warehouse_location: Option<String>,
    #[serde(default)]
    pub reorder_level: i32,
}

impl Product {
    /// Low stock means on-hand quantity at or below the reorder level.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.reorder_level
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.quantity <= 0
    }

    pub fn supplier_name(&self) -> Option<&str> {
        self.supplier.as_ref().and_then(|s| s.name.as_deref())
    }
}

/// The product nested inside an inventory log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    pub id: ProductId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub quantity: Option<i32>,
}

// ── Inventory logs ───────────────────────────────────────────────────

/// Direction of a stock movement.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum MovementType {
    #[default]
    In,
    Out,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryLog {
    pub id: LogId,
    #[serde(default)]
    pub product: Option<ProductRef>,
    #[serde(rename = "type")]
    pub movement: MovementType,
    pub quantity: i32,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl InventoryLog {
    pub fn product_name(&self) -> Option<&str> {
        self.product.as_ref().and_then(|p| p.name.as_deref())
    }
}

// ── Reports ──────────────────────────────────────────────────────────

/// Figures computed by the backend for `/inventory/reports` and
/// `/inventory/stats`. The client displays them as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryReport {
    #[serde(default)]
    pub stock_valuation: Decimal,
    #[serde(default)]
    pub fast_moving: Vec<Product>,
    #[serde(default)]
    pub slow_moving: Vec<Product>,
    #[serde(default)]
    pub turnover_rate: f64,
}

// ── Request payloads ─────────────────────────────────────────────────

/// Bare identity reference. Writes never embed the full nested object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRef {
    pub id: i64,
}

/// Body for `POST /products` and `PUT /products/{id}`.
///
/// `supplier` always serializes, as `{"id": N}` or `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub name: String,
    pub description: String,
    pub category: String,
    pub quantity: i32,
    pub price: Decimal,
    pub warehouse_location: String,
    pub reorder_level: i32,
    pub supplier: Option<IdRef>,
}

/// Body for `POST /suppliers` and `PUT /suppliers/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierPayload {
    pub name: String,
    pub contact_info: String,
    pub email: String,
    pub address: String,
}

/// Body for `POST /inventory/update-stock`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockUpdate {
    pub product_id: ProductId,
    pub quantity: i32,
    #[serde(rename = "type")]
    pub movement: MovementType,
    pub notes: Option<String>,
}

/// Body for `POST /inventory/logs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogPayload {
    pub product: IdRef,
    #[serde(rename = "type")]
    pub movement: MovementType,
    pub quantity: i32,
    pub notes: Option<String>,
}

/// Body for `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Generic `{"message": ...}` acknowledgement (logout, errors).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn product(quantity: i32, reorder_level: i32) -> Product {
        Product {
            id: 1,
            name: "Widget".into(),
            description: None,
            category: None,
            supplier: None,
            quantity,
            price: Decimal::ZERO,
            warehouse_location: None,
            reorder_level,
        }
    }

    #[test]
    fn low_stock_boundary_is_inclusive() {
        assert!(product(5, 10).is_low_stock());
        assert!(product(10, 10).is_low_stock());
        assert!(!product(11, 10).is_low_stock());
    }

    #[test]
    fn only_admin_views_reports() {
        assert!(Role::Admin.can_view_reports());
        assert!(!Role::Staff.can_view_reports());
    }

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(Role::Staff.to_string(), "STAFF");
    }

    #[test]
    fn product_payload_sends_minimal_supplier_reference() {
        let payload = ProductPayload {
            name: "Widget".into(),
            description: String::new(),
            category: "Tools".into(),
            quantity: 3,
            price: Decimal::new(1999, 2),
            warehouse_location: "A1".into(),
            reorder_level: 2,
            supplier: Some(IdRef { id: 7 }),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["supplier"], json!({"id": 7}));
        assert_eq!(value["warehouseLocation"], json!("A1"));
        assert_eq!(value["reorderLevel"], json!(2));
        assert_eq!(value["price"], json!(19.99));
    }

    #[test]
    fn product_payload_without_supplier_sends_null() {
        let payload = ProductPayload {
            name: "Widget".into(),
            description: String::new(),
            category: String::new(),
            quantity: 0,
            price: Decimal::ZERO,
            warehouse_location: String::new(),
            reorder_level: 0,
            supplier: None,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value["supplier"].is_null());
        assert!(value.as_object().unwrap().contains_key("supplier"));
    }

    #[test]
    fn log_deserializes_backend_shape() {
        let log: InventoryLog = serde_json::from_value(json!({
            "id": 4,
            "product": {"id": 1, "name": "Widget", "quantity": 7, "price": 2.5},
            "type": "OUT",
            "quantity": 3,
            "notes": null,
            "createdAt": "2024-05-01T10:15:30.123"
        }))
        .unwrap();
        assert_eq!(log.movement, MovementType::Out);
        assert_eq!(log.product_name(), Some("Widget"));
        assert!(log.created_at.is_some());
    }

    #[test]
    fn stock_update_uses_type_key() {
        let body = StockUpdate {
            product_id: 9,
            quantity: 3,
            movement: MovementType::Out,
            notes: Some("damaged".into()),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"productId": 9, "quantity": 3, "type": "OUT", "notes": "damaged"})
        );
    }

    #[test]
    fn initials_from_name() {
        let user = User {
            id: 1,
            name: "ada lovelace byron".into(),
            email: "ada@example.com".into(),
            role: Role::Admin,
        };
        assert_eq!(user.initials(), "AL");
    }
}
