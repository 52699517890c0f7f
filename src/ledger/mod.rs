use anyhow::Result;

mod amount;
mod date;
mod header;
mod row;
mod transaction;

pub use amount::{normalize_amount, parse_amount};
pub use date::parse_timestamp;
pub use header::{find_header_line, HEADER_MARKER};
pub use row::{LedgerRow, COLUMN_COUNT};
pub use transaction::{
    Direction, RowError, Transaction, FALLBACK_CATEGORY, FALLBACK_COUNTERPARTY,
    FALLBACK_DESCRIPTION, FALLBACK_PAYMENT_METHOD,
};

/// The data rows of an exported ledger file, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    /// Zero-based index of the header line, `None` if the file has no header
    header_line: Option<usize>,
    rows: Vec<LedgerRow>,
}

impl Ledger {
    pub fn header_line(&self) -> Option<usize> {
        self.header_line
    }

    pub fn has_header(&self) -> bool {
        self.header_line.is_some()
    }

    pub fn rows(&self) -> &[LedgerRow] {
        &self.rows
    }
}

/// Splits the file content into the header position and the data rows after it.
///
/// The preamble before the header is ignored. A file without a header yields a ledger
/// without rows; callers decide whether that is an error.
pub fn parse(content: &str) -> Result<Ledger> {
    let content = content.strip_prefix('\u{FEFF}').unwrap_or(content);
    let Some(header_line) = find_header_line(content) else {
        return Ok(Ledger {
            header_line: None,
            rows: vec![],
        });
    };

    let mut rows = Vec::new();
    for (index, line) in content.lines().enumerate().skip(header_line + 1) {
        if line.trim().is_empty() {
            continue;
        }
        rows.push(LedgerRow::parse(index + 1, line)?);
    }
    log::debug!(
        "Found header on line {} and {} data rows",
        header_line + 1,
        rows.len()
    );

    Ok(Ledger {
        header_line: Some(header_line),
        rows,
    })
}
