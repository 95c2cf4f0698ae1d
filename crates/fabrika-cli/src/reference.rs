//! Managers and activity types: the two reference directories whose names
//! populate the factory grid's choice columns.
//!
//! Manager accounts are an administrator's business. The backend enforces
//! that; a non-admin session changing them only gets a warning here.

use anyhow::Result;
use clap::Args;
use fabrika_client::Session;
use fabrika_core::{ActivityType, Manager, ReferenceLists};

use crate::records::{run_record_command, RecordCommand};
use crate::CliContext;

pub const MANAGER_COLUMNS: &[&str] = &[
    "manager_name",
    "login",
    "role",
    "manager_phone",
    "manager_email",
];

pub const ACTIVITY_TYPE_COLUMNS: &[&str] = &["name", "description"];

#[derive(Args, Debug)]
pub struct ManagersArgs {
    #[command(subcommand)]
    pub command: RecordCommand,
}

#[derive(Args, Debug)]
pub struct ActivityTypesArgs {
    #[command(subcommand)]
    pub command: RecordCommand,
}

pub async fn run_managers(ctx: &CliContext, args: &ManagersArgs) -> Result<u8> {
    let client = ctx.client()?;
    if changes_without_admin(&args.command, client.session()) {
        tracing::warn!("manager accounts are changed by administrators; the backend may refuse");
    }
    run_record_command(
        ctx,
        &args.command,
        client.managers(),
        ReferenceLists::default(),
        Manager::default(),
        MANAGER_COLUMNS,
    )
    .await
}

fn changes_without_admin(command: &RecordCommand, session: Option<&Session>) -> bool {
    let changes = command.mutates() || matches!(command, RecordCommand::Delete { .. });
    changes && !session.is_some_and(Session::is_admin)
}

pub async fn run_activity_types(ctx: &CliContext, args: &ActivityTypesArgs) -> Result<u8> {
    let client = ctx.client()?;
    run_record_command(
        ctx,
        &args.command,
        client.activity_types(),
        ReferenceLists::default(),
        ActivityType::default(),
        ACTIVITY_TYPE_COLUMNS,
    )
    .await
}
