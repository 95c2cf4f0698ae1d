//! # Contacts Subcommand
//!
//! Employees of every factory, or of one factory with `--inn`. Besides the
//! shared record commands there is `toggle-lead`, and `watch`, which keeps
//! the list on screen and reloads it every minute until interrupted.
//! New contacts are always created for a factory, so `create` needs `--inn`.

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use fabrika_client::{FabrikaClient, RecordService};
use fabrika_core::{Employee, Entity, FieldValue, Inn, RecordId, ReferenceLists};
use fabrika_grid::{EditableRecordGrid, MutationOutcome, RefreshTimer, CONTACTS_REFRESH};

use crate::records::{
    exit_code, expire_on_rejection, load_grid, print_view, run_record_command, RecordCommand,
    ViewArgs,
};
use crate::terminal::TerminalHost;
use crate::CliContext;

/// Default `list` columns.
pub const CONTACT_COLUMNS: &[&str] = &[
    "name_factory",
    "employee",
    "position",
    "phone",
    "email",
    "lead",
];

#[derive(Args, Debug)]
pub struct ContactsArgs {
    /// Restrict to the staff of the factory with this INN.
    #[arg(long, global = true)]
    pub inn: Option<String>,

    #[command(subcommand)]
    pub command: ContactsCommand,
}

#[derive(Subcommand, Debug)]
pub enum ContactsCommand {
    #[command(flatten)]
    Records(RecordCommand),

    /// Flip the lead flag of a contact.
    ToggleLead { id: RecordId },

    /// Show the list and reload it every minute until Ctrl-C.
    Watch(ViewArgs),
}

pub async fn run_contacts(ctx: &CliContext, args: &ContactsArgs) -> Result<u8> {
    let client = ctx.client()?;
    let inn = args
        .inn
        .as_deref()
        .map(Inn::new)
        .transpose()
        .context("invalid --inn")?;
    let service = match &inn {
        Some(inn) => client.employees_of(inn),
        None => client.employees(),
    };

    match &args.command {
        ContactsCommand::Records(command) => {
            let draft = match (command, &inn) {
                (RecordCommand::Create { .. }, Some(inn)) => contact_draft(&client, inn).await?,
                (RecordCommand::Create { .. }, None) => {
                    bail!("contacts are created for a factory; pass --inn")
                }
                _ => Employee::default(),
            };
            run_record_command(
                ctx,
                command,
                service,
                ReferenceLists::default(),
                draft,
                CONTACT_COLUMNS,
            )
            .await
        }
        ContactsCommand::ToggleLead { id } => toggle_lead(ctx, service, *id).await,
        ContactsCommand::Watch(view) => watch(ctx, service, view).await,
    }
}

/// An empty contact attached to the factory holding `inn`.
async fn contact_draft(client: &FabrikaClient, inn: &Inn) -> Result<Employee> {
    let factory = client
        .factories()
        .find_by_natural_key(inn.as_str())
        .await
        .context("failed to look up the factory")?
        .with_context(|| format!("no factory with INN {inn}"))?;
    Ok(Employee::for_factory(inn.clone(), factory.data.name))
}

async fn toggle_lead<S: RecordService<Employee>>(ctx: &CliContext, service: S, id: RecordId) -> Result<u8> {
    let mut grid = EditableRecordGrid::new(service, TerminalHost::new());
    load_grid(ctx, &mut grid).await?;

    let row = grid
        .row(id)
        .with_context(|| format!("no {} with id {id}", Employee::KIND))?;
    let next = row.data.lead.toggled();

    let outcome = grid
        .edit_cell(id, "lead", FieldValue::text(next.as_str()))
        .await?;
    expire_on_rejection(ctx, &mut grid)?;
    if outcome == MutationOutcome::Applied {
        println!("OK: contact {id} lead is now {next}");
    }
    Ok(exit_code(outcome))
}

async fn watch<S: RecordService<Employee>>(ctx: &CliContext, service: S, view: &ViewArgs) -> Result<u8> {
    let mut grid = EditableRecordGrid::new(service, TerminalHost::new());
    load_grid(ctx, &mut grid).await?;
    print_view(&grid, view, CONTACT_COLUMNS)?;

    let mut timer = RefreshTimer::new(CONTACTS_REFRESH);
    loop {
        tokio::select! {
            _ = timer.tick() => {
                match load_grid(ctx, &mut grid).await {
                    Ok(_) => {
                        println!();
                        print_view(&grid, view, CONTACT_COLUMNS)?;
                    }
                    Err(e) => {
                        if ctx.store.load()?.is_none() {
                            return Err(e);
                        }
                        eprintln!("reload failed: {e:#}");
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::debug!("watch interrupted");
                return Ok(0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        contacts: ContactsArgs,
    }

    #[test]
    fn inn_is_accepted_after_the_subcommand() {
        let cli = TestCli::try_parse_from(["test", "list", "--inn", "7701234567"]).unwrap();
        assert_eq!(cli.contacts.inn.as_deref(), Some("7701234567"));
        assert!(matches!(
            cli.contacts.command,
            ContactsCommand::Records(RecordCommand::List(_))
        ));
    }

    #[test]
    fn toggle_lead_takes_an_id() {
        let cli = TestCli::try_parse_from(["test", "toggle-lead", "4"]).unwrap();
        assert!(matches!(
            cli.contacts.command,
            ContactsCommand::ToggleLead { id } if id == RecordId::new(4)
        ));
    }

    #[test]
    fn default_columns_exist() {
        for column in CONTACT_COLUMNS {
            assert!(Employee::field_spec(column).is_ok(), "{column}");
        }
    }
}
