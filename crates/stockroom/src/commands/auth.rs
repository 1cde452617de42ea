//! Account handlers: whoami, register, seed-demo.

use stockroom_core::Stockroom;
use stockroom_core::accounts::{self, SeedResult};
use stockroom_core::model::{Role, User};

use crate::cli::{GlobalOpts, RegisterArgs, RoleArg};
use crate::config;
use crate::error::CliError;
use crate::output;

fn detail(u: &User) -> String {
    [
        format!("ID:     {}", u.id),
        format!("Name:   {}", u.name),
        format!("Email:  {}", u.email),
        format!("Role:   {}", u.role),
    ]
    .join("\n")
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Admin => Role::Admin,
            RoleArg::Staff => Role::Staff,
        }
    }
}

/// The account the one-shot session logged in as.
pub fn whoami(stockroom: &Stockroom, global: &GlobalOpts) -> Result<(), CliError> {
    let user = stockroom
        .session()
        .current_user()
        .ok_or(CliError::SessionExpired)?;
    let out = output::render_single(&global.output, &user, detail, |u| u.email.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Register an account. Needs no session; the new account is not logged in.
pub async fn register(
    stockroom: &Stockroom,
    args: RegisterArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let email = global.email.clone().ok_or_else(|| CliError::Validation {
        field: "email".into(),
        reason: "pass --email for the new account".into(),
    })?;
    let password = config::prompt_password(&email)?;

    let user = accounts::register(
        stockroom.api(),
        &args.name,
        &email,
        &password,
        args.role.into(),
    )
    .await?;

    let out = output::render_single(&global.output, &user, detail, |u| u.id.to_string());
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn seed_demo(stockroom: &Stockroom, global: &GlobalOpts) -> Result<(), CliError> {
    let results = accounts::seed_demo_accounts(stockroom.api()).await?;
    for (account, result) in results {
        let status = match result {
            SeedResult::Created(_) => "created",
            SeedResult::AlreadyExists => "already registered",
        };
        output::notice(
            &format!("{} ({}): {status}", account.email, account.role),
            global.quiet,
        );
    }
    Ok(())
}
