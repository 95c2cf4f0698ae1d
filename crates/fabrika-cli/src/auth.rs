//! # Session Subcommands
//!
//! - `login`: exchange credentials for a token and store the session.
//! - `logout`: forget the stored session.
//! - `whoami`: check the stored session against the backend. A rejected
//!   token logs the session out.

use anyhow::{bail, Context, Result};
use clap::Args;
use fabrika_client::{ApiError, Credentials};
use zeroize::Zeroizing;

use crate::terminal::prompt_line;
use crate::CliContext;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account login.
    #[arg(long)]
    pub login: String,

    /// Password. Prompted on stdin when omitted; the prompt echoes what is typed.
    #[arg(long, env = "FABRIKA_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

pub async fn run_login(ctx: &CliContext, args: &LoginArgs) -> Result<u8> {
    let password = match &args.password {
        Some(p) => Zeroizing::new(p.clone()),
        None => Zeroizing::new(prompt_line("Password: ").context("failed to read password")?),
    };
    let credentials = Credentials::new(args.login.as_str(), password.as_str());

    let client = ctx.anonymous_client()?;
    let session = match client.auth().login(&credentials).await {
        Ok(session) => session,
        Err(e @ ApiError::Unauthorized { .. }) => {
            bail!("login failed: {}", e.user_message());
        }
        Err(e) => return Err(anyhow::Error::new(e).context("login failed")),
    };
    ctx.store.save(&session)?;

    tracing::info!(login = %session.user.login, "logged in");
    println!(
        "OK: logged in as {} ({})",
        display_name(&session.user.login, session.user.manager_name.as_deref()),
        session.user.role
    );
    Ok(0)
}

pub fn run_logout(ctx: &CliContext) -> Result<u8> {
    if ctx.store.clear()? {
        println!("OK: logged out");
    } else {
        println!("Not logged in.");
    }
    Ok(0)
}

pub async fn run_whoami(ctx: &CliContext) -> Result<u8> {
    let client = ctx.client()?;
    let Some(session) = client.session() else {
        bail!("not logged in; run `fabrika login` first");
    };
    match client.auth().me(session).await {
        Ok(profile) => {
            println!("Login: {}", profile.login);
            println!("Name:  {}", profile.manager_name.as_deref().unwrap_or("-"));
            println!("Role:  {}", profile.role);
            Ok(0)
        }
        Err(e) => {
            ctx.expire_if_unauthorized(&e)?;
            if matches!(e, ApiError::Unauthorized { .. }) {
                println!("Session expired; log in again.");
                return Ok(1);
            }
            Err(anyhow::Error::new(e).context("failed to fetch the current user"))
        }
    }
}

fn display_name(login: &str, manager_name: Option<&str>) -> String {
    match manager_name {
        Some(name) if !name.trim().is_empty() => format!("{name} [{login}]"),
        _ => login.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_prefers_manager_name() {
        assert_eq!(display_name("ivanov", Some("Иванов И.И.")), "Иванов И.И. [ivanov]");
        assert_eq!(display_name("ivanov", Some(" ")), "ivanov");
        assert_eq!(display_name("ivanov", None), "ivanov");
    }

    #[test]
    fn logout_without_session() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = CliContext::new(Some("http://localhost:8000"), dir.path().join("s.json")).unwrap();
        assert_eq!(run_logout(&ctx).unwrap(), 0);
    }
}
