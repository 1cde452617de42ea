// ── Runtime connection configuration ──
//
// These types describe how to reach an inventory backend. They carry
// credential data and connection tuning, but never touch disk. The CLI/TUI
// builds a `ClientConfig` from its profile and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use stockroom_api::transport::{TlsMode, TransportConfig};

/// Email + password used to open a session.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed dev backends).
    DangerAcceptInvalid,
}

/// Configuration for talking to a single backend.
///
/// Built by CLI/TUI, passed to `Stockroom` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend origin (e.g. `http://localhost:7090`). `/api` is appended.
    pub url: Url,
    /// Credentials for one-shot sessions. Interactive front ends may leave
    /// this empty and log in through the session store instead.
    pub credentials: Option<Credentials>,
    pub tls: TlsVerification,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            credentials: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Translate into the api crate's transport settings.
    pub fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
            cookie_jar: None,
        }
        .with_cookie_jar()
    }
}
