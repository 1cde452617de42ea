// Auth endpoints
//
// Cookie-based session login/logout. `POST /auth/login` sets the session
// cookie in the client's jar; every later request carries it automatically.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{MessageBody, Registration, User};

impl ApiClient {
    /// Authenticate with email and password.
    ///
    /// `POST /auth/login`. Bad credentials come back as
    /// `Error::Unauthorized` carrying the backend's message.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<User, Error> {
        debug!(email, "logging in");
        let body = json!({
            "email": email,
            "password": password.expose_secret(),
        });
        let user: User = self.post("auth/login", &body).await?;
        debug!(user.id, role = %user.role, "login successful");
        Ok(user)
    }

    /// End the current server-side session.
    ///
    /// `POST /auth/logout`
    pub async fn logout(&self) -> Result<(), Error> {
        debug!("logging out");
        let _: MessageBody = self.post("auth/logout", &json!({})).await?;
        Ok(())
    }

    /// Session check: who does the backend think we are?
    ///
    /// `GET /auth/me`. 401 when no session is attached.
    pub async fn me(&self) -> Result<User, Error> {
        self.get("auth/me").await
    }

    /// Create an account.
    ///
    /// `POST /auth/register`. A duplicate email is rejected by the backend
    /// with HTTP 400 and `"Email already registered"`.
    pub async fn register(&self, registration: &Registration) -> Result<User, Error> {
        debug!(email = %registration.email, role = %registration.role, "registering user");
        self.post("auth/register", registration).await
    }
}
