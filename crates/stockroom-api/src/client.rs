// Inventory API HTTP client
//
// Wraps `reqwest::Client` with the `/api` base path, the session cookie jar,
// and uniform status mapping. Resource endpoints (auth, products, suppliers,
// inventory) are inherent methods implemented in sibling modules so this file
// stays focused on transport mechanics.

use std::sync::Arc;

use reqwest::Method;
use reqwest::cookie::Jar;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::models::MessageBody;
use crate::transport::TransportConfig;

/// Path prefix every backend route lives under.
pub const API_PREFIX: &str = "api";

/// Async client for the inventory REST backend.
///
/// Cheap to clone: the underlying `reqwest::Client` and cookie jar are
/// reference-counted, so every clone shares one session.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    cookie_jar: Option<Arc<Jar>>,
    unauthorized: Arc<watch::Sender<u64>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Create a client for the backend rooted at `server`.
    ///
    /// `server` is the backend origin (e.g. `http://localhost:7090`); the
    /// `/api` prefix is appended here. A cookie jar is created when the
    /// transport config doesn't carry one, since the session lives in a
    /// cookie.
    pub fn new(server: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let cookie_jar = config.cookie_jar.clone();
        let http = config.build_client()?;
        let base_url = Self::normalize_base_url(server)?;
        let (unauthorized, _) = watch::channel(0);

        Ok(Self {
            http,
            base_url,
            cookie_jar,
            unauthorized: Arc::new(unauthorized),
        })
    }

    /// `https://host:port/app` -> `https://host:port/app/api/`
    fn normalize_base_url(server: &str) -> Result<Url, Error> {
        let trimmed = server.trim().trim_end_matches('/');
        let mut url = Url::parse(trimmed)?;
        let path = format!("{}/{API_PREFIX}/", url.path().trim_end_matches('/'));
        url.set_path(&path);
        Ok(url)
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// The resolved `/api/` base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Whether the jar currently holds a cookie for the backend.
    pub fn has_session_cookie(&self) -> bool {
        use reqwest::cookie::CookieStore;

        self.cookie_jar
            .as_ref()
            .and_then(|jar| jar.cookies(&self.base_url))
            .is_some()
    }

    /// Counter bumped on every 401. Observers can watch it to react to
    /// session expiry without the client itself navigating anywhere.
    pub fn unauthorized_events(&self) -> watch::Receiver<u64> {
        self.unauthorized.subscribe()
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Resolve a path relative to `/api/`. A leading `/` is ignored.
    pub fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send `method path` with an optional JSON body and decode the JSON reply.
    pub async fn request<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        let resp = self.send(method, path, body).await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.request::<T, ()>(Method::GET, path, None).await
    }

    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, Error> {
        let mut url = self.url(path)?;
        url.query_pairs_mut().extend_pairs(query);
        debug!("GET {url}");
        let resp = self.http.get(url).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync + ?Sized),
    ) -> Result<T, Error> {
        self.request(Method::POST, path, Some(body)).await
    }

    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync + ?Sized),
    ) -> Result<T, Error> {
        self.request(Method::PUT, path, Some(body)).await
    }

    /// DELETE and discard whatever body comes back.
    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        let resp = self.send::<()>(Method::DELETE, path, None).await?;
        self.handle_empty(resp).await
    }

    /// POST with no body and discard the reply.
    pub(crate) async fn post_empty(&self, path: &str) -> Result<(), Error> {
        let resp = self.send::<()>(Method::POST, path, None).await?;
        self.handle_empty(resp).await
    }

    /// GET raw bytes (non-JSON downloads such as CSV exports).
    pub(crate) async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, Error> {
        let resp = self.send::<()>(Method::GET, path, None).await?;
        let status = resp.status();
        if status.is_success() {
            Ok(resp.bytes().await?.to_vec())
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<reqwest::Response, Error>
    where
        B: Serialize + Sync + ?Sized,
    {
        let url = self.url(path)?;
        debug!("{method} {url}");

        let mut builder = self.http.request(method, url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        Ok(builder.send().await?)
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview = body
                    .char_indices()
                    .nth(200)
                    .map_or(body.as_str(), |(i, _)| &body[..i]);
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<MessageBody>(&raw)
            .ok()
            .and_then(|body| body.message)
            .filter(|m| !m.trim().is_empty());

        if status == reqwest::StatusCode::UNAUTHORIZED {
            warn!("backend answered 401 (unauthorized)");
            self.unauthorized.send_modify(|count| *count += 1);
            return Error::Unauthorized { message };
        }

        Error::Api {
            status: status.as_u16(),
            message,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_api_prefix() {
        let client = ApiClient::new("http://localhost:7090", &TransportConfig::default()).unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:7090/api/");
    }

    #[test]
    fn base_url_keeps_subpath_and_trims_slash() {
        let client =
            ApiClient::new("https://host/inventory_management/", &TransportConfig::default())
                .unwrap();
        assert_eq!(
            client.url("/products/3").unwrap().as_str(),
            "https://host/inventory_management/api/products/3"
        );
    }

    #[test]
    fn invalid_server_is_rejected() {
        let err = ApiClient::new("not a url", &TransportConfig::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn fresh_client_has_no_session_cookie() {
        let client = ApiClient::new("http://localhost:7090", &TransportConfig::default()).unwrap();
        assert!(!client.has_session_cookie());
    }
}
