//! CLI configuration: thin wrapper around `stockroom_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--server, --email, etc.).

use std::io::IsTerminal;
use std::time::Duration;

use secrecy::SecretString;

use stockroom_core::{ClientConfig, Credentials, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use stockroom_config::{
    Config, DEFAULT_SERVER, Defaults, Profile, config_path, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Build the `ClientConfig` for this invocation: the active profile with
/// flag overrides, or flags alone when no profile exists.
///
/// `need_credentials` is false for commands that never open a session
/// (`register`, `seed-demo`).
pub fn build_client_config(
    global: &GlobalOpts,
    need_credentials: bool,
) -> Result<ClientConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None => {
            // No profile: --server / STOCKROOM_SERVER must say where to go.
            let server = global.server.clone().ok_or_else(|| CliError::NoConfig {
                path: config_path().display().to_string(),
            })?;
            Profile {
                server,
                ..Profile::default()
            }
        }
    };

    resolve_profile(&profile, &profile_name, global, need_credentials)
}

/// Translate a `Profile` + global flags into a `ClientConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
    need_credentials: bool,
) -> Result<ClientConfig, CliError> {
    // 1. Server URL (flag > env > profile)
    let url_str = global.server.as_deref().unwrap_or(&profile.server);
    let url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    let mut config = ClientConfig::new(url);

    // 2. Credentials
    if need_credentials {
        config.credentials = Some(resolve_credentials(profile, profile_name, global)?);
    }

    // 3. TLS verification
    config.tls = if global.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        stockroom_config::tls_for(profile)
    };

    // 4. Timeout (explicit profile value wins over the flag's default)
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(global.timeout));

    Ok(config)
}

/// Email from flag or profile; password from the shared chain, falling
/// back to an interactive prompt on a terminal.
fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<Credentials, CliError> {
    let email = match global.email {
        Some(ref email) => email.clone(),
        None => stockroom_config::resolve_email(profile, profile_name)?,
    };

    let password = match stockroom_config::resolve_password(profile, profile_name) {
        Ok(pw) => pw,
        Err(_) if std::io::stdin().is_terminal() => prompt_password(&email)?,
        Err(e) => return Err(e.into()),
    };

    Ok(Credentials { email, password })
}

pub fn prompt_password(email: &str) -> Result<SecretString, CliError> {
    let pw = rpassword::prompt_password(format!("Password for {email}: "))?;
    if pw.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }
    Ok(SecretString::from(pw))
}
