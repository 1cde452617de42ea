// stockroom-core: session, routing, and list-edit state machines for stockroom

pub mod accounts;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod list_edit;
pub mod model;
pub mod resources;
pub mod route;
pub mod session;
pub mod stockroom;

pub use config::{ClientConfig, Credentials, TlsVerification};
pub use error::CoreError;
pub use list_edit::{ListEditController, ListState, Resource};
pub use route::{GateDecision, Route, gate, landing, navigation};
pub use session::{LoginOutcome, SessionState, SessionStore};
pub use stockroom::{InventoryLogsController, ProductsController, Stockroom, SuppliersController};
