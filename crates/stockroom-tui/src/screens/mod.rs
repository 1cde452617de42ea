//! Screen implementations. Each screen is a top-level Component keyed by
//! the route it renders.

pub mod dashboard;
pub mod list;
pub mod login;
pub mod logs;
pub mod products;
pub mod reports;
pub mod suppliers;

use stockroom_core::{Route, Stockroom};

use crate::component::Component;

/// One component per routable view.
pub fn create_screens(stockroom: &Stockroom) -> Vec<(Route, Box<dyn Component>)> {
    let email = stockroom
        .config()
        .credentials
        .as_ref()
        .map(|c| c.email.clone());

    vec![
        (
            Route::Login,
            Box::new(login::LoginScreen::new(stockroom.session().clone(), email)),
        ),
        (
            Route::Dashboard,
            Box::new(dashboard::DashboardScreen::new(stockroom.session().clone())),
        ),
        (
            Route::Products,
            Box::new(list::ListScreen::new(stockroom.products())),
        ),
        (
            Route::Suppliers,
            Box::new(list::ListScreen::new(stockroom.suppliers())),
        ),
        (
            Route::InventoryLogs,
            Box::new(list::ListScreen::new(stockroom.inventory_logs())),
        ),
        (
            Route::Reports,
            Box::new(reports::ReportsScreen::new(stockroom.clone())),
        ),
    ]
}
