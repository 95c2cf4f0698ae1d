//! # Factories Subcommand
//!
//! The factory grid (`list`, `show`, `edit`, `create`, `delete`) and the
//! spreadsheet export. Edits and creates are checked against the manager
//! and activity-type lists, which are fetched together before the grid
//! loads.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use fabrika_client::{ExportFilter, FabrikaClient};
use fabrika_core::{Factory, ReferenceLists};

use crate::records::{run_record_command, RecordCommand};
use crate::CliContext;

/// Default `list` columns.
pub const FACTORY_COLUMNS: &[&str] = &[
    "name",
    "inn",
    "city",
    "manager",
    "type_factory",
    "date_created",
];

#[derive(Args, Debug)]
pub struct FactoriesArgs {
    #[command(subcommand)]
    pub command: FactoriesCommand,
}

#[derive(Subcommand, Debug)]
pub enum FactoriesCommand {
    #[command(flatten)]
    Records(RecordCommand),

    /// Download the factories spreadsheet.
    Export(ExportArgs),
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Only factories created on or after this date (YYYY-MM-DD).
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Only factories created on or before this date (YYYY-MM-DD).
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Directory to write the file into.
    #[arg(long, short, default_value = ".")]
    pub out: PathBuf,
}

pub async fn run_factories(ctx: &CliContext, args: &FactoriesArgs) -> Result<u8> {
    let client = ctx.client()?;
    match &args.command {
        FactoriesCommand::Records(command) => {
            let references = if command.mutates() {
                client.load_reference_lists().await
            } else {
                ReferenceLists::default()
            };
            run_record_command(
                ctx,
                command,
                client.factories(),
                references,
                Factory::default(),
                FACTORY_COLUMNS,
            )
            .await
        }
        FactoriesCommand::Export(export) => run_export(ctx, &client, export).await,
    }
}

async fn run_export(ctx: &CliContext, client: &FabrikaClient, args: &ExportArgs) -> Result<u8> {
    let filter = ExportFilter::new(args.start, args.end)?;
    let file = match client.export().factories_excel(&filter).await {
        Ok(file) => file,
        Err(e) => {
            ctx.expire_if_unauthorized(&e)?;
            return Err(anyhow::Error::new(e).context("export failed"));
        }
    };

    let path = write_export(&args.out, &file.filename, &file.bytes)?;
    println!("OK: wrote {} ({} bytes)", path.display(), file.bytes.len());
    Ok(0)
}

fn write_export(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(filename);
    std::fs::write(&path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(subcommand)]
        command: FactoriesCommand,
    }

    #[test]
    fn record_commands_are_flattened() {
        let cli = TestCli::try_parse_from(["test", "delete", "3", "-y"]).unwrap();
        assert!(matches!(
            cli.command,
            FactoriesCommand::Records(RecordCommand::Delete { yes: true, .. })
        ));
    }

    #[test]
    fn export_parses_dates() {
        let cli = TestCli::try_parse_from([
            "test", "export", "--start", "2025-01-01", "--end", "2025-01-31", "-o", "out",
        ])
        .unwrap();
        let FactoriesCommand::Export(args) = cli.command else {
            panic!("expected export");
        };
        assert_eq!(args.start, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(args.out, PathBuf::from("out"));
    }

    #[test]
    fn export_rejects_bad_date() {
        assert!(TestCli::try_parse_from(["test", "export", "--start", "2025-13-01"]).is_err());
    }

    #[test]
    fn export_is_written_into_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("exports");
        let path = write_export(&out, "fabriki_export_2025-02-01.xlsx", &[1, 2, 3]).unwrap();
        assert_eq!(path, out.join("fabriki_export_2025-02-01.xlsx"));
        assert_eq!(std::fs::read(path).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn default_columns_exist() {
        use fabrika_core::Entity;
        for column in FACTORY_COLUMNS {
            assert!(Factory::field_spec(column).is_ok(), "{column}");
        }
    }
}
