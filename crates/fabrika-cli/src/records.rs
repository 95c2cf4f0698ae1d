//! # Record Subcommands
//!
//! `list`, `show`, `edit`, `create` and `delete`, shared by every entity.
//! Each invocation loads a fresh grid, performs one operation through it,
//! and maps the outcome to an exit code: 0 when the change was applied (or
//! the operator declined a delete), 1 when it was rejected.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use fabrika_client::RecordService;
use fabrika_core::{Entity, FieldValue, RecordId, ReferenceLists};
use fabrika_grid::{EditableRecordGrid, GridError, GridHost, MutationOutcome, SortOrder, ViewOptions};

use crate::render::{render_record, render_table};
use crate::terminal::TerminalHost;
use crate::{parse_assignment, CliContext};

/// Filtering, sorting and column selection for `list`.
#[derive(Args, Debug, Default, Clone)]
pub struct ViewArgs {
    /// Keep rows whose FIELD contains TEXT, ignoring case. Repeatable.
    #[arg(long = "filter", value_name = "FIELD=TEXT", value_parser = parse_assignment)]
    pub filters: Vec<(String, String)>,

    /// Sort by FIELD.
    #[arg(long, value_name = "FIELD")]
    pub sort: Option<String>,

    /// Sort descending.
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Comma-separated columns to show.
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,
}

impl ViewArgs {
    pub fn options(&self) -> ViewOptions {
        let mut options = ViewOptions::new();
        for (field, needle) in &self.filters {
            options = options.filter(field, needle);
        }
        if let Some(field) = &self.sort {
            let order = if self.desc {
                SortOrder::Descending
            } else {
                SortOrder::Ascending
            };
            options = options.sort_by(field, order);
        }
        options
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum RecordCommand {
    /// List rows.
    List(ViewArgs),

    /// Show every field of one row.
    Show {
        id: RecordId,
    },

    /// Change one cell. The row is saved immediately.
    Edit {
        id: RecordId,
        field: String,
        /// New value; an empty string clears an optional field.
        value: String,
    },

    /// Create a row.
    Create {
        /// Field value for the new row. Repeatable.
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
        fields: Vec<(String, String)>,
    },

    /// Delete a row after confirmation.
    Delete {
        id: RecordId,
        /// Do not ask for confirmation.
        #[arg(long, short)]
        yes: bool,
    },
}

impl RecordCommand {
    /// Whether the command writes, and so needs reference lists.
    pub fn mutates(&self) -> bool {
        matches!(self, Self::Edit { .. } | Self::Create { .. })
    }

    fn assume_yes(&self) -> bool {
        matches!(self, Self::Delete { yes: true, .. })
    }
}

/// Run one record command against `service`.
///
/// `draft` seeds the create form; `columns` are the default list columns.
pub async fn run_record_command<E, S>(
    ctx: &CliContext,
    command: &RecordCommand,
    service: S,
    references: ReferenceLists,
    draft: E,
    columns: &[&str],
) -> Result<u8>
where
    E: Entity,
    S: RecordService<E>,
{
    let host = TerminalHost::new().assume_yes(command.assume_yes());
    let mut grid = EditableRecordGrid::new(service, host).with_references(references);
    load_grid(ctx, &mut grid).await?;

    match command {
        RecordCommand::List(view) => {
            print_view(&grid, view, columns)?;
            Ok(0)
        }

        RecordCommand::Show { id } => {
            let row = grid
                .row(*id)
                .with_context(|| format!("no {} with id {id}", E::KIND))?;
            print!("{}", render_record(row));
            Ok(0)
        }

        RecordCommand::Edit { id, field, value } => {
            let outcome = grid.edit_cell(*id, field, FieldValue::text(value)).await?;
            expire_on_rejection(ctx, &mut grid)?;
            if outcome == MutationOutcome::Applied {
                println!("OK: {} {id} {field} saved", E::KIND);
            }
            Ok(exit_code(outcome))
        }

        RecordCommand::Create { fields } => {
            grid.open_create(draft);
            for (field, value) in fields {
                grid.fill_create_field(field, FieldValue::text(value))
                    .with_context(|| format!("invalid value for {field}"))?;
            }
            let outcome = grid.submit_create().await?;
            expire_on_rejection(ctx, &mut grid)?;
            if outcome == MutationOutcome::Applied {
                if let Some(created) = grid.rows().last() {
                    println!("OK: created {} {}", E::KIND, created.id);
                }
            }
            Ok(exit_code(outcome))
        }

        RecordCommand::Delete { id, .. } => {
            let outcome = grid.delete_row(*id).await?;
            expire_on_rejection(ctx, &mut grid)?;
            match outcome {
                MutationOutcome::Applied => println!("OK: deleted {} {id}", E::KIND),
                MutationOutcome::Cancelled => println!("Cancelled."),
                _ => {}
            }
            Ok(exit_code(outcome))
        }
    }
}

/// Load the grid, logging out when the backend rejects the session.
pub async fn load_grid<E, S, H>(
    ctx: &CliContext,
    grid: &mut EditableRecordGrid<E, S, H>,
) -> Result<usize>
where
    E: Entity,
    S: RecordService<E>,
    H: GridHost,
{
    match grid.load().await {
        Ok(count) => Ok(count),
        Err(GridError::Load(e)) => {
            ctx.expire_if_unauthorized(&e)?;
            Err(anyhow::Error::new(e).context(format!("failed to load {}", E::COLLECTION)))
        }
        Err(e) => Err(e.into()),
    }
}

/// Log out when a mutation or its resync was refused for the session.
pub fn expire_on_rejection<E, S, H>(
    ctx: &CliContext,
    grid: &mut EditableRecordGrid<E, S, H>,
) -> Result<()>
where
    E: Entity,
    S: RecordService<E>,
    H: GridHost,
{
    match grid.take_last_error() {
        Some(e) => ctx.expire_if_unauthorized(&e),
        None => Ok(()),
    }
}

/// Print the filtered, sorted rows as a table.
pub fn print_view<E, S, H>(
    grid: &EditableRecordGrid<E, S, H>,
    view: &ViewArgs,
    default_columns: &[&str],
) -> Result<()>
where
    E: Entity,
    S: RecordService<E>,
    H: GridHost,
{
    let columns: Vec<&str> = if view.columns.is_empty() {
        default_columns.to_vec()
    } else {
        view.columns.iter().map(String::as_str).collect()
    };
    for column in &columns {
        E::field_spec(column)?;
    }

    let rows = grid.view(&view.options())?;
    print!("{}", render_table(&rows, &columns));
    println!("{} of {} rows", rows.len(), grid.rows().len());
    Ok(())
}

pub fn exit_code(outcome: MutationOutcome) -> u8 {
    match outcome {
        MutationOutcome::Applied | MutationOutcome::Cancelled => 0,
        MutationOutcome::Conflict | MutationOutcome::Failed | MutationOutcome::Invalid => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(subcommand)]
        command: RecordCommand,
    }

    fn parse(args: &[&str]) -> RecordCommand {
        let mut argv = vec!["test"];
        argv.extend_from_slice(args);
        TestCli::try_parse_from(argv).unwrap().command
    }

    #[test]
    fn list_parses_view_options() {
        let RecordCommand::List(view) = parse(&[
            "list", "--filter", "name=хим", "--filter", "inn=77", "--sort", "manager", "--desc",
            "--columns", "name,inn",
        ]) else {
            panic!("expected list");
        };
        assert_eq!(view.filters.len(), 2);
        assert_eq!(view.columns, vec!["name", "inn"]);
        let expected = ViewOptions::new()
            .filter("name", "хим")
            .filter("inn", "77")
            .sort_by("manager", SortOrder::Descending);
        assert_eq!(view.options(), expected);
    }

    #[test]
    fn edit_takes_id_field_and_value() {
        let command = parse(&["edit", "7", "inn", "999"]);
        assert!(command.mutates());
        let RecordCommand::Edit { id, field, value } = command else {
            panic!("expected edit");
        };
        assert_eq!(id, RecordId::new(7));
        assert_eq!(field, "inn");
        assert_eq!(value, "999");
    }

    #[test]
    fn create_collects_assignments() {
        let RecordCommand::Create { fields } =
            parse(&["create", "--set", "name=X", "--set", "inn=123"])
        else {
            panic!("expected create");
        };
        assert_eq!(
            fields,
            vec![
                ("name".to_string(), "X".to_string()),
                ("inn".to_string(), "123".to_string())
            ]
        );
    }

    #[test]
    fn delete_yes_skips_confirmation() {
        assert!(parse(&["delete", "3", "--yes"]).assume_yes());
        assert!(!parse(&["delete", "3"]).assume_yes());
    }

    #[test]
    fn desc_requires_sort() {
        assert!(TestCli::try_parse_from(["test", "list", "--desc"]).is_err());
    }

    #[test]
    fn exit_codes() {
        assert_eq!(exit_code(MutationOutcome::Applied), 0);
        assert_eq!(exit_code(MutationOutcome::Cancelled), 0);
        assert_eq!(exit_code(MutationOutcome::Conflict), 1);
        assert_eq!(exit_code(MutationOutcome::Invalid), 1);
    }
}
