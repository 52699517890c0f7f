use rust_decimal::Decimal;
use std::str::FromStr as _;

const CURRENCY_SYMBOLS: [char; 5] = ['¥', '￥', '$', '€', '£'];
const THOUSANDS_SEPARATOR: char = ',';

/// Strips currency symbols, whitespace and thousands separators from an amount cell.
pub fn normalize_amount(content: &str) -> String {
    content
        .chars()
        .filter(|c| {
            !CURRENCY_SYMBOLS.contains(c) && !c.is_whitespace() && *c != THOUSANDS_SEPARATOR
        })
        .collect()
}

/// Parses an amount cell like `¥1,200.00`. Returns `None` if it isn't a number.
pub fn parse_amount(content: &str) -> Option<Decimal> {
    let normalized = normalize_amount(content);
    if normalized.is_empty() {
        return None;
    }
    Decimal::from_str(&normalized).ok()
}
