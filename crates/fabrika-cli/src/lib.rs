//! # fabrika-cli: Command-Line Directory Client
//!
//! Provides the `fabrika` command. Every entity view of the directory is an
//! [`EditableRecordGrid`](fabrika_grid::EditableRecordGrid) driven from the
//! terminal, so edits, creates and deletes follow the same probe, save and
//! resync protocol everywhere.
//!
//! ## Subcommands
//!
//! - `fabrika login` / `logout` / `whoami`: session management.
//! - `fabrika factories`: the factory grid and the Excel export.
//! - `fabrika contacts`: employees, all or one factory's, plus lead toggling
//!   and a self-refreshing watch view.
//! - `fabrika managers`, `fabrika activity-types`: reference directories.
//!
//! ```bash
//! fabrika login --login ivanov
//! fabrika factories list --filter name=хим --sort manager
//! fabrika factories edit 7 inn 7701234567
//! fabrika contacts --inn 7701234567 create --set employee="Сидоров С.С."
//! fabrika factories export --start 2025-01-01 --end 2025-01-31
//! ```

pub mod auth;
pub mod contacts;
pub mod factories;
pub mod records;
pub mod reference;
pub mod render;
pub mod session_store;
pub mod terminal;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use fabrika_client::{ApiError, FabrikaApiConfig, FabrikaClient};

use crate::session_store::SessionStore;

/// Backend configuration and session storage shared by every subcommand.
#[derive(Debug, Clone)]
pub struct CliContext {
    pub api: FabrikaApiConfig,
    pub store: SessionStore,
}

impl CliContext {
    /// Configuration from the environment, with `--api-url` taking precedence.
    pub fn new(api_url: Option<&str>, session_file: PathBuf) -> Result<Self> {
        let api = match api_url {
            Some(url) => FabrikaApiConfig::with_base_url(url)?,
            None => FabrikaApiConfig::from_env()?,
        };
        Ok(Self {
            api,
            store: SessionStore::new(session_file),
        })
    }

    /// A client without credentials, for logging in.
    pub fn anonymous_client(&self) -> Result<FabrikaClient> {
        FabrikaClient::new(self.api.clone()).context("failed to build HTTP client")
    }

    /// A client carrying the stored session.
    pub fn client(&self) -> Result<FabrikaClient> {
        let Some(session) = self.store.load()? else {
            bail!("not logged in; run `fabrika login` first");
        };
        Ok(self.anonymous_client()?.with_session(session))
    }

    /// Drop the stored session when the backend rejected it.
    pub fn expire_if_unauthorized(&self, err: &ApiError) -> Result<()> {
        if matches!(err, ApiError::Unauthorized { .. }) {
            self.store.clear()?;
            tracing::warn!("session rejected by the backend; logged out");
        }
        Ok(())
    }
}

/// Parse a `FIELD=VALUE` argument. The value may be empty.
pub fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got `{raw}`"))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in `{raw}`"));
    }
    Ok((field.to_string(), value.to_string()))
}
