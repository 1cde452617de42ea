// ── Session store ──
//
// Process-wide belief about who is logged in. Three states:
// `Restoring` (start-up, before the session check answers),
// `Authenticated(user)`, and `Anonymous`. The only mutations are
// `restore`, `login`, `logout`, and `expire`; every reader observes changes
// through a `watch` channel.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use stockroom_api::ApiClient;

use crate::error::CoreError;
use crate::model::{Role, User};

const LOGIN_FALLBACK: &str = "Login failed";

// ── SessionState ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Initial session check still in flight.
    Restoring,
    Authenticated(User),
    Anonymous,
}

impl SessionState {
    /// True only while the initial restore is pending.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Restoring)
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.user().map(|u| u.role)
    }
}

// ── LoginOutcome ─────────────────────────────────────────────────

/// Result of a login attempt. Failures never escape as errors; they carry
/// a message ready for display.
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    Success(User),
    Failure(CoreError),
}

impl LoginOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Display text for a failure; `None` on success.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Success(_) => None,
            Self::Failure(err) => Some(match err {
                CoreError::Unauthorized { message } => message.clone(),
                other => other.display_message(LOGIN_FALLBACK),
            }),
        }
    }
}

// ── SessionStore ─────────────────────────────────────────────────

/// Cheaply cloneable handle to the single session of a process.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    api: ApiClient,
    state: watch::Sender<SessionState>,
}

impl SessionStore {
    /// Create a store in `Restoring`. Call [`restore()`](Self::restore) to
    /// resolve it.
    pub fn new(api: ApiClient) -> Self {
        let (state, _) = watch::channel(SessionState::Restoring);
        Self {
            inner: Arc::new(SessionInner { api, state }),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    pub fn current_user(&self) -> Option<User> {
        self.inner.state.borrow().user().cloned()
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    fn transition(&self, next: SessionState) {
        self.inner.state.send_if_modified(|state| {
            if *state == next {
                false
            } else {
                *state = next;
                true
            }
        });
    }

    // ── Mutations ────────────────────────────────────────────────

    /// Ask the backend whether the cookie jar already holds a live session.
    ///
    /// Any failure at all (401, network, garbage body) lands in `Anonymous`.
    pub async fn restore(&self) -> SessionState {
        let next = match self.inner.api.me().await {
            Ok(user) => {
                info!(email = %user.email, role = %user.role, "session restored");
                SessionState::Authenticated(user)
            }
            Err(e) if e.is_unauthorized() => {
                debug!("no existing session");
                SessionState::Anonymous
            }
            Err(e) => {
                warn!(error = %e, "session check failed, treating as anonymous");
                SessionState::Anonymous
            }
        };
        self.transition(next.clone());
        next
    }

    /// Log in with email and password.
    ///
    /// Blank fields short-circuit with a validation failure and no request.
    /// On failure the state is left untouched.
    pub async fn login(&self, email: &str, password: &SecretString) -> LoginOutcome {
        let email = email.trim();
        if email.is_empty() || password.expose_secret().is_empty() {
            return LoginOutcome::Failure(CoreError::validation("Please fill in all fields"));
        }

        match self.inner.api.login(email, password).await {
            Ok(user) => {
                info!(email = %user.email, role = %user.role, "logged in");
                self.transition(SessionState::Authenticated(user.clone()));
                LoginOutcome::Success(user)
            }
            Err(e) => {
                debug!(error = %e, "login rejected");
                LoginOutcome::Failure(CoreError::from(e))
            }
        }
    }

    /// Best-effort logout: the backend call may fail, the local state is
    /// `Anonymous` afterwards regardless.
    pub async fn logout(&self) {
        if let Err(e) = self.inner.api.logout().await {
            warn!(error = %e, "logout failed (non-fatal)");
        }
        info!("logged out");
        self.transition(SessionState::Anonymous);
    }

    /// A resource call reported the session gone. Moves an authenticated
    /// session to `Anonymous` once; later calls are no-ops.
    pub fn expire(&self) -> bool {
        let expired = self.inner.state.send_if_modified(|state| {
            if matches!(state, SessionState::Authenticated(_)) {
                *state = SessionState::Anonymous;
                true
            } else {
                false
            }
        });
        if expired {
            info!("session expired");
        }
        expired
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &*self.inner.state.borrow())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use stockroom_api::TransportConfig;

    use super::*;

    fn store() -> SessionStore {
        // Port 9 (discard) on localhost: any request that escapes fails fast.
        let api = ApiClient::new("http://127.0.0.1:9", &TransportConfig::default()).unwrap();
        SessionStore::new(api)
    }

    fn user(role: Role) -> User {
        User {
            id: 1,
            name: "Ada".into(),
            email: "ada@example.com".into(),
            role,
        }
    }

    #[test]
    fn starts_restoring() {
        let store = store();
        assert!(store.state().is_loading());
        assert!(store.current_user().is_none());
    }

    #[tokio::test]
    async fn blank_login_fields_fail_validation() {
        let store = store();
        let outcome = store.login("", &SecretString::from("pw".to_string())).await;
        assert!(!outcome.is_success());
        assert_eq!(outcome.message().as_deref(), Some("Please fill in all fields"));

        let outcome = store
            .login("ada@example.com", &SecretString::from(String::new()))
            .await;
        assert!(matches!(outcome, LoginOutcome::Failure(CoreError::Validation { .. })));
        assert!(store.state().is_loading());
    }

    #[test]
    fn expire_only_moves_authenticated_sessions() {
        let store = store();
        assert!(!store.expire());
        assert_eq!(store.state(), SessionState::Restoring);

        store.transition(SessionState::Authenticated(user(Role::Staff)));
        assert!(store.expire());
        assert_eq!(store.state(), SessionState::Anonymous);
        assert!(!store.expire());
    }

    #[test]
    fn subscribers_see_transitions() {
        let store = store();
        let mut rx = store.subscribe();
        store.transition(SessionState::Authenticated(user(Role::Admin)));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().role(), Some(Role::Admin));
    }
}
