use std::collections::BTreeSet;

use crate::ledger::{LedgerRow, FALLBACK_CATEGORY, FALLBACK_PAYMENT_METHOD};

/// Distinct categorical values seen in a ledger, used as select options.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SchemaOptions {
    pub categories: BTreeSet<String>,
    pub payment_methods: BTreeSet<String>,
}

impl SchemaOptions {
    /// Collects categories and payment methods from every row, valid or not.
    pub fn infer(rows: &[LedgerRow]) -> Self {
        let mut options = Self::default();
        for row in rows {
            if let Some(category) = &row.category {
                options.categories.insert(category.clone());
            }
            if let Some(payment_method) = &row.payment_method {
                options.payment_methods.insert(payment_method.clone());
            }
        }
        options
    }

    /// Observed categories followed by the fallback category.
    pub fn category_options(&self) -> Vec<String> {
        with_fallback(&self.categories, FALLBACK_CATEGORY)
    }

    /// Observed payment methods followed by the fallback payment method.
    pub fn payment_method_options(&self) -> Vec<String> {
        with_fallback(&self.payment_methods, FALLBACK_PAYMENT_METHOD)
    }
}

fn with_fallback(observed: &BTreeSet<String>, fallback: &str) -> Vec<String> {
    observed
        .iter()
        .filter(|value| value.as_str() != fallback)
        .cloned()
        .chain(std::iter::once(fallback.to_string()))
        .collect()
}
