// ── Stockroom facade ──
//
// Owns the one api client and the one session store of a process, and vends
// list-edit controllers for each page. Front ends talk to this type only.

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, info};

use stockroom_api::ApiClient;

use crate::config::ClientConfig;
use crate::dashboard::{self, DashboardSummary};
use crate::error::CoreError;
use crate::list_edit::ListEditController;
use crate::model::{InventoryLog, InventoryReport, StockDraft, User};
use crate::resources::{InventoryLogResource, ProductResource, SupplierResource};
use crate::route::{Route, landing};
use crate::session::{LoginOutcome, SessionState, SessionStore};

pub type ProductsController = ListEditController<ProductResource>;
pub type SuppliersController = ListEditController<SupplierResource>;
pub type InventoryLogsController = ListEditController<InventoryLogResource>;

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<StockroomInner>`.
#[derive(Clone)]
pub struct Stockroom {
    inner: Arc<StockroomInner>,
}

struct StockroomInner {
    config: ClientConfig,
    api: ApiClient,
    session: SessionStore,
}

impl Stockroom {
    /// Build the client and an unresolved (`Restoring`) session. Does not
    /// touch the network.
    pub fn new(config: ClientConfig) -> Result<Self, CoreError> {
        let api = ApiClient::new(config.url.as_str(), &config.transport())?;
        let session = SessionStore::new(api.clone());
        Ok(Self {
            inner: Arc::new(StockroomInner {
                config,
                api,
                session,
            }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    // ── Controllers ──────────────────────────────────────────────

    /// A fresh controller. Pages own their controller; nothing is shared.
    pub fn products(&self) -> ProductsController {
        ListEditController::new(ProductResource::new(self.api().clone()), self.session().clone())
    }

    pub fn suppliers(&self) -> SuppliersController {
        ListEditController::new(SupplierResource::new(self.api().clone()), self.session().clone())
    }

    pub fn inventory_logs(&self) -> InventoryLogsController {
        ListEditController::new(
            InventoryLogResource::new(self.api().clone()),
            self.session().clone(),
        )
    }

    // ── Session lifecycle ────────────────────────────────────────

    /// Resolve the session: reuse a live one, else log in with the
    /// configured credentials if there are any.
    pub async fn connect(&self) -> Result<User, CoreError> {
        if let SessionState::Authenticated(user) = self.session().restore().await {
            return Ok(user);
        }

        let creds = self.config().credentials.as_ref().ok_or_else(|| CoreError::Config {
            message: "no credentials configured".into(),
        })?;

        match self.session().login(&creds.email, &creds.password).await {
            LoginOutcome::Success(user) => Ok(user),
            LoginOutcome::Failure(err) => Err(err),
        }
    }

    /// Log out if a session is open. Never fails.
    pub async fn disconnect(&self) {
        if self.session().state().user().is_some() {
            self.session().logout().await;
        }
        debug!("disconnected");
    }

    /// Connect, run `f`, disconnect.
    pub async fn oneshot<F, Fut, T>(config: ClientConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Stockroom) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let stockroom = Stockroom::new(config)?;
        let user = stockroom.connect().await?;
        info!(email = %user.email, "session open");
        let result = f(stockroom.clone()).await;
        stockroom.disconnect().await;
        result
    }

    // ── Gated views ──────────────────────────────────────────────

    /// Fail unless the route gate would render `route` for this session.
    pub fn ensure_route(&self, route: Route) -> Result<(), CoreError> {
        let state = self.session().state();
        match landing(&state, route) {
            Some(r) if r == route => Ok(()),
            Some(Route::Login) | None => Err(CoreError::Unauthorized {
                message: "log in first".into(),
            }),
            Some(_) => Err(CoreError::Forbidden {
                message: Some(format!("{} is available to administrators only", route.label())),
            }),
        }
    }

    pub async fn dashboard(&self) -> Result<DashboardSummary, CoreError> {
        self.ensure_route(Route::Dashboard)?;
        self.expire_on_unauthorized(dashboard::fetch_dashboard(self.api()).await)
    }

    pub async fn reports(&self) -> Result<InventoryReport, CoreError> {
        self.ensure_route(Route::Reports)?;
        self.expire_on_unauthorized(dashboard::fetch_reports(self.api()).await)
    }

    /// The backend's CSV export, fetched with this session's cookie.
    pub async fn export_csv(&self) -> Result<Vec<u8>, CoreError> {
        self.ensure_route(Route::Reports)?;
        self.expire_on_unauthorized(self.api().download_csv().await.map_err(CoreError::from))
    }

    /// Append a log entry without adjusting the product's quantity, for
    /// backfilling movements that were already applied by hand.
    pub async fn record_log(&self, draft: &StockDraft) -> Result<InventoryLog, CoreError> {
        self.ensure_route(Route::InventoryLogs)?;
        let resource = InventoryLogResource::new(self.api().clone());
        self.expire_on_unauthorized(resource.record_entry(draft).await)
    }

    fn expire_on_unauthorized<T>(&self, result: Result<T, CoreError>) -> Result<T, CoreError> {
        if matches!(&result, Err(e) if e.is_unauthorized()) {
            self.session().expire();
        }
        result
    }
}

impl std::fmt::Debug for Stockroom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stockroom")
            .field("url", &self.inner.config.url.as_str())
            .field("session", &self.inner.session)
            .finish()
    }
}
