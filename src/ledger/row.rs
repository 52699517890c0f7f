use anyhow::{Context as _, Result};

/// Number of leading columns that carry transaction data. Later columns are ignored.
pub const COLUMN_COUNT: usize = 7;

/// One non-empty data line of the export, split into its positional fields.
///
/// Fields are trimmed and unquoted. Empty fields and fields missing from short lines
/// are `None`, validation happens later when the row is turned into a
/// [Transaction](super::Transaction).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRow {
    /// One-based line number in the source file
    pub line_number: usize,
    /// The line as it appeared in the file
    pub raw: String,
    pub timestamp: Option<String>,
    pub category: Option<String>,
    pub counterparty: Option<String>,
    pub description: Option<String>,
    pub direction: Option<String>,
    pub amount: Option<String>,
    pub payment_method: Option<String>,
}

impl LedgerRow {
    pub fn parse(line_number: usize, line: &str) -> Result<Self> {
        let mut fields = split_line(line)
            .with_context(|| format!("Failed to split line {line_number}: {line}"))?;
        if fields.len() < COLUMN_COUNT {
            log::debug!(
                "Line {line_number} has only {} of {COLUMN_COUNT} columns, treating the rest as empty",
                fields.len(),
            );
            fields.resize(COLUMN_COUNT, None);
        }
        let mut fields = fields.into_iter();
        let mut next = || fields.next().flatten();
        Ok(Self {
            line_number,
            raw: line.to_string(),
            timestamp: next(),
            category: next(),
            counterparty: next(),
            description: next(),
            direction: next(),
            amount: next(),
            payment_method: next(),
        })
    }
}

fn split_line(line: &str) -> Result<Vec<Option<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(b',')
        .from_reader(line.as_bytes());
    let mut record = csv::StringRecord::new();
    if !reader.read_record(&mut record)? {
        return Ok(vec![]);
    }
    Ok(record.iter().map(clean_field).collect())
}

fn clean_field(field: &str) -> Option<String> {
    let field = field.trim();
    let field = field
        .strip_prefix('"')
        .and_then(|field| field.strip_suffix('"'))
        .unwrap_or(field);
    if field.is_empty() {
        None
    } else {
        Some(field.to_string())
    }
}
