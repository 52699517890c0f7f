use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use std::fmt::Display;

use super::{amount::parse_amount, date::parse_timestamp, row::LedgerRow};

pub const FALLBACK_CATEGORY: &str = "其他";
pub const FALLBACK_COUNTERPARTY: &str = "未知";
pub const FALLBACK_DESCRIPTION: &str = "无描述";
pub const FALLBACK_PAYMENT_METHOD: &str = "其他";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    Income,
    #[default]
    Expense,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Income, Direction::Expense];

    /// Anything that isn't explicitly income, including the neutral `/`, counts as expense.
    pub fn parse(content: Option<&str>) -> Self {
        match content {
            Some("收入") => Direction::Income,
            Some("支出") | None => Direction::Expense,
            Some(other) => {
                log::debug!("Unknown direction '{other}', treating it as expense");
                Direction::Expense
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Direction::Income => "收入",
            Direction::Expense => "支出",
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RowError {
    #[error("Invalid date '{0}'")]
    InvalidDate(String),
    #[error("Invalid amount '{0}'")]
    InvalidAmount(String),
}

/// A validated ledger row, ready to be written to Notion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub timestamp: NaiveDateTime,
    pub category: String,
    pub counterparty: String,
    pub description: String,
    pub direction: Direction,
    pub amount: Decimal,
    pub payment_method: String,
}

impl Transaction {
    /// Returns `Ok(None)` for rows without timestamp or amount, those are skipped silently.
    pub fn from_row(row: &LedgerRow) -> Result<Option<Self>, RowError> {
        let (Some(timestamp_text), Some(amount_text)) = (&row.timestamp, &row.amount) else {
            return Ok(None);
        };
        let timestamp = parse_timestamp(timestamp_text)
            .ok_or_else(|| RowError::InvalidDate(timestamp_text.clone()))?;
        let amount = parse_amount(amount_text)
            .ok_or_else(|| RowError::InvalidAmount(amount_text.clone()))?;

        Ok(Some(Self {
            timestamp,
            category: or_fallback(&row.category, FALLBACK_CATEGORY),
            counterparty: or_fallback(&row.counterparty, FALLBACK_COUNTERPARTY),
            description: or_fallback(&row.description, FALLBACK_DESCRIPTION),
            direction: Direction::parse(row.direction.as_deref()),
            amount,
            payment_method: or_fallback(&row.payment_method, FALLBACK_PAYMENT_METHOD),
        }))
    }

    /// The timestamp as a UTC instant, interpreting the exported wall-clock time at `utc_offset`.
    pub fn instant(&self, utc_offset: FixedOffset) -> Option<DateTime<Utc>> {
        self.timestamp
            .and_local_timezone(utc_offset)
            .single()
            .map(|timestamp| timestamp.with_timezone(&Utc))
    }
}

fn or_fallback(value: &Option<String>, fallback: &str) -> String {
    value.clone().unwrap_or_else(|| fallback.to_string())
}
