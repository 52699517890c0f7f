use chrono::{FixedOffset, SecondsFormat};

use crate::ledger::{LedgerRow, RowError, Transaction};
use crate::notion_api::{DatabaseId, NotionDatabase, NotionError, PageProperties, PropertyValue};
use crate::schema::{
    PROPERTY_AMOUNT, PROPERTY_CATEGORY, PROPERTY_COUNTERPARTY, PROPERTY_DATE, PROPERTY_DIRECTION,
    PROPERTY_PAYMENT_METHOD, PROPERTY_TITLE,
};

#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    Imported,
    Skipped,
    Failed,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub failed: usize,
    /// Rows without timestamp or amount. They count as neither imported nor failed.
    pub skipped: usize,
}

impl ImportSummary {
    fn record(&mut self, outcome: RowOutcome) {
        match outcome {
            RowOutcome::Imported => self.imported += 1,
            RowOutcome::Failed => self.failed += 1,
            RowOutcome::Skipped => self.skipped += 1,
        }
    }
}

/// Writes ledger rows to a Notion database, one page per row, strictly in file order.
pub struct Importer<'a, D: NotionDatabase> {
    database: &'a D,
    database_id: &'a DatabaseId,
    utc_offset: FixedOffset,
}

impl<'a, D: NotionDatabase> Importer<'a, D> {
    pub fn new(database: &'a D, database_id: &'a DatabaseId, utc_offset: FixedOffset) -> Self {
        Self {
            database,
            database_id,
            utc_offset,
        }
    }

    /// Imports all rows. A failing row is logged and counted, it never stops the import.
    pub async fn import(&self, rows: &[LedgerRow]) -> ImportSummary {
        let mut summary = ImportSummary::default();
        for row in rows {
            summary.record(self.import_row(row).await);
        }
        summary
    }

    pub async fn import_row(&self, row: &LedgerRow) -> RowOutcome {
        let transaction = match Transaction::from_row(row) {
            Ok(Some(transaction)) => transaction,
            Ok(None) => {
                log::debug!("Skipping line {} without date or amount", row.line_number);
                return RowOutcome::Skipped;
            }
            Err(err) => {
                log::error!("Skipping line {}: {err}", row.line_number);
                return RowOutcome::Failed;
            }
        };
        let properties = match page_properties(&transaction, self.utc_offset) {
            Ok(properties) => properties,
            Err(err) => {
                log::error!("Skipping line {}: {err}", row.line_number);
                return RowOutcome::Failed;
            }
        };

        match self
            .database
            .create_page(self.database_id, &properties)
            .await
        {
            Ok(_page_id) => {
                log::info!(
                    "Imported: {} {} {}",
                    row.timestamp.as_deref().unwrap_or_default(),
                    transaction.description,
                    row.amount.as_deref().unwrap_or_default(),
                );
                RowOutcome::Imported
            }
            Err(err) => {
                for line in submission_failure(row, &err) {
                    log::error!("{line}");
                }
                RowOutcome::Failed
            }
        }
    }
}

/// Describes a rejected page: the line, its raw content and the response body Notion sent.
fn submission_failure(row: &LedgerRow, err: &NotionError) -> Vec<String> {
    let mut lines = vec![
        format!("Failed to import line {}: {err}", row.line_number),
        format!("Line: {}", row.raw),
    ];
    if let Some(body) = err.body() {
        lines.push(format!("Notion response: {body}"));
    }
    lines
}

/// Maps a transaction onto the database properties.
pub fn page_properties(
    transaction: &Transaction,
    utc_offset: FixedOffset,
) -> Result<PageProperties, RowError> {
    let instant = transaction
        .instant(utc_offset)
        .ok_or_else(|| RowError::InvalidDate(transaction.timestamp.to_string()))?;

    let mut properties = PageProperties::new();
    properties.insert(
        PROPERTY_TITLE.to_string(),
        PropertyValue::title(&transaction.description),
    );
    properties.insert(
        PROPERTY_DATE.to_string(),
        PropertyValue::Date {
            start: instant.to_rfc3339_opts(SecondsFormat::Millis, true),
        },
    );
    properties.insert(
        PROPERTY_CATEGORY.to_string(),
        PropertyValue::select(&transaction.category),
    );
    properties.insert(
        PROPERTY_COUNTERPARTY.to_string(),
        PropertyValue::rich_text(&transaction.counterparty),
    );
    properties.insert(
        PROPERTY_DIRECTION.to_string(),
        PropertyValue::select(transaction.direction.label()),
    );
    properties.insert(
        PROPERTY_AMOUNT.to_string(),
        PropertyValue::Number(transaction.amount),
    );
    properties.insert(
        PROPERTY_PAYMENT_METHOD.to_string(),
        PropertyValue::select(&transaction.payment_method),
    );
    Ok(properties)
}
