// ── Account registration ──
//
// Registration is outside the session: it never logs anyone in. A duplicate
// email is an explicit `CoreError::Conflict`, so callers decide whether
// "already there" counts as success (demo seeding does) or as a failure
// (interactive registration does).

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};

use stockroom_api::ApiClient;
use stockroom_api::models::Registration;

use crate::error::CoreError;
use crate::model::{Role, User};

const DUPLICATE_MARKER: &str = "already registered";

/// A demo account the login screen can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoAccount {
    pub name: &'static str,
    pub email: &'static str,
    pub password: &'static str,
    pub role: Role,
}

pub const DEMO_ACCOUNTS: [DemoAccount; 2] = [
    DemoAccount {
        name: "Admin",
        email: "admin@inventory.com",
        password: "admin123",
        role: Role::Admin,
    },
    DemoAccount {
        name: "Staff",
        email: "staff@inventory.com",
        password: "staff123",
        role: Role::Staff,
    },
];

/// What happened to one account during seeding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedResult {
    Created(User),
    AlreadyExists,
}

/// Register a new account.
///
/// Blank name, email, or password fail locally. The backend's
/// `"Email already registered"` rejection becomes `CoreError::Conflict`.
pub async fn register(
    api: &ApiClient,
    name: &str,
    email: &str,
    password: &SecretString,
    role: Role,
) -> Result<User, CoreError> {
    if name.trim().is_empty() || email.trim().is_empty() || password.expose_secret().is_empty() {
        return Err(CoreError::validation("Name, email, and password are required"));
    }

    let registration = Registration {
        name: name.trim().to_owned(),
        email: email.trim().to_owned(),
        password: password.expose_secret().to_owned(),
        role,
    };

    match api.register(&registration).await {
        Ok(user) => {
            info!(email = %user.email, role = %user.role, "account registered");
            Ok(user)
        }
        Err(e) if is_duplicate(&e) => Err(CoreError::Conflict {
            message: e
                .backend_message()
                .unwrap_or("Email already registered")
                .to_owned(),
        }),
        Err(e) => Err(e.into()),
    }
}

fn is_duplicate(err: &stockroom_api::Error) -> bool {
    matches!(err.status(), Some(400 | 409))
        && err
            .backend_message()
            .is_some_and(|m| m.to_lowercase().contains(DUPLICATE_MARKER))
}

/// Make sure both demo accounts exist. Existing ones are reported, not failed.
pub async fn seed_demo_accounts(
    api: &ApiClient,
) -> Result<Vec<(DemoAccount, SeedResult)>, CoreError> {
    let mut results = Vec::with_capacity(DEMO_ACCOUNTS.len());
    for account in DEMO_ACCOUNTS {
        let password = SecretString::from(account.password.to_owned());
        let outcome = match register(api, account.name, account.email, &password, account.role).await {
            Ok(user) => SeedResult::Created(user),
            Err(CoreError::Conflict { .. }) => {
                debug!(email = account.email, "demo account already exists");
                SeedResult::AlreadyExists
            }
            Err(e) => return Err(e),
        };
        results.push((account, outcome));
    }
    Ok(results)
}
