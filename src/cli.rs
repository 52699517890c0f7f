use anyhow::{anyhow, Context as _};
use chrono::FixedOffset;
use console::{style, StyledObject};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::args::Args;
use crate::config::{LedgerConfig, NotionConfig};
use crate::import::{ImportSummary, Importer};
use crate::ledger::{self, Ledger, HEADER_MARKER};
use crate::notion_api::{DatabaseId, DryRun, Notion, NotionDatabase};
use crate::schema::{self, SchemaOptions, PROPERTY_CATEGORY, PROPERTY_PAYMENT_METHOD};
use crate::terminal::{BulletPointPrinter, LineWriter};

const EXIT_FAILURE: u8 = 1;
const EXIT_USAGE: u8 = 2;
const EXIT_SCHEMA_SYNC: u8 = 3;

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Ledger file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("No line containing '{}' found in {}, is this a WeChat Pay export?", HEADER_MARKER, .0.display())]
    MissingHeader(PathBuf),

    #[error("Invalid configuration: {0:#}")]
    Config(anyhow::Error),

    #[error("Schema synchronization failed, nothing was imported: {0:#}")]
    SchemaSync(anyhow::Error),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl RunError {
    pub fn exit_status(&self) -> u8 {
        match self {
            RunError::FileNotFound(_) | RunError::MissingHeader(_) | RunError::Config(_) => {
                EXIT_USAGE
            }
            RunError::SchemaSync(_) => EXIT_SCHEMA_SYNC,
            RunError::Unexpected(_) => EXIT_FAILURE,
        }
    }
}

pub async fn main(args: Args) -> ExitCode {
    match run(&args).await {
        Ok(_summary) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::from(err.exit_status())
        }
    }
}

pub async fn run(args: &Args) -> Result<ImportSummary, RunError> {
    let printer = BulletPointPrinter::new_stdout();

    let ledger = load_ledger(&args.file).await?;
    let options = SchemaOptions::infer(ledger.rows());
    print_schema_options(&printer, &options);

    let ledger_config = LedgerConfig::from_env().map_err(RunError::Config)?;
    let summary = if args.dry_run {
        import_dry_run(&ledger, &options, ledger_config.utc_offset).await?
    } else {
        import_to_notion(&ledger, &options, ledger_config.utc_offset).await?
    };

    print_summary(&printer, &summary);
    Ok(summary)
}

async fn load_ledger(path: &Path) -> Result<Ledger, RunError> {
    let exists = tokio::fs::try_exists(path)
        .await
        .with_context(|| anyhow!("Failed to access {}", path.display()))?;
    if !exists {
        return Err(RunError::FileNotFound(resolve(path)));
    }

    log::info!("Loading ledger...");
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| anyhow!("Failed to read {}", path.display()))?;
    let ledger = ledger::parse(&content)?;
    if !ledger.has_header() {
        return Err(RunError::MissingHeader(resolve(path)));
    }
    log::info!("Loading ledger...done, found {} rows", ledger.rows().len());
    if ledger.rows().is_empty() {
        log::warn!("The ledger has no data rows");
    }
    Ok(ledger)
}

fn resolve(path: &Path) -> PathBuf {
    std::env::current_dir()
        .map(|dir| dir.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

async fn import_dry_run(
    ledger: &Ledger,
    options: &SchemaOptions,
    utc_offset: FixedOffset,
) -> Result<ImportSummary, RunError> {
    log::info!("Dry run, nothing will be written to Notion");
    let database = DryRun::new();
    let database_id = DatabaseId::new("dry-run".to_string());
    let summary = sync_and_import(&database, &database_id, ledger, options, utc_offset).await?;
    Ok(summary)
}

async fn import_to_notion(
    ledger: &Ledger,
    options: &SchemaOptions,
    utc_offset: FixedOffset,
) -> Result<ImportSummary, RunError> {
    let config = NotionConfig::from_env().map_err(RunError::Config)?;
    log::debug!("Using {config:?}");
    let notion = Notion::new(&config)?;
    let summary = sync_and_import(&notion, &config.database_id, ledger, options, utc_offset).await?;
    Ok(summary)
}

/// Updates the schema before any page is created, so every select value written already exists.
async fn sync_and_import(
    database: &impl NotionDatabase,
    database_id: &DatabaseId,
    ledger: &Ledger,
    options: &SchemaOptions,
    utc_offset: FixedOffset,
) -> Result<ImportSummary, RunError> {
    schema::synchronize(database, database_id, options)
        .await
        .map_err(RunError::SchemaSync)?;
    Ok(Importer::new(database, database_id, utc_offset)
        .import(ledger.rows())
        .await)
}

fn print_schema_options<W: LineWriter + Clone>(
    printer: &BulletPointPrinter<W>,
    options: &SchemaOptions,
) {
    printer.print_header(style_header("Schema options:"));
    for (property, values) in [
        (PROPERTY_CATEGORY, options.category_options()),
        (PROPERTY_PAYMENT_METHOD, options.payment_method_options()),
    ] {
        printer.print_item(style_property(property));
        let printer = printer.indent();
        for value in values {
            printer.print_item(value);
        }
    }
}

fn print_summary<W: LineWriter + Clone>(printer: &BulletPointPrinter<W>, summary: &ImportSummary) {
    printer.print_header(style_header("Import finished:"));
    printer.print_item(style(format!("{} imported", summary.imported)).green());
    let failed = style(format!("{} failed", summary.failed));
    printer.print_item(if summary.failed > 0 {
        failed.red()
    } else {
        failed
    });
    printer.print_item(style(format!("{} skipped", summary.skipped)).dim());
}

fn style_header(header: &str) -> StyledObject<&str> {
    style(header).bold().underlined()
}

fn style_property(property: &str) -> StyledObject<&str> {
    style(property).magenta()
}
