use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::CategoryAmount;

/// Spending against the monthly budget for one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub total_spent: Decimal,
    pub categories: BTreeMap<String, Decimal>,
    pub budget: Decimal,
    /// Negative once the budget is exceeded.
    pub remaining: Decimal,
    pub is_over_budget: bool,
}

impl MonthlySummary {
    pub fn new(budget: Decimal, total_spent: Option<Decimal>, categories: Vec<CategoryAmount>) -> Self {
        let total_spent = total_spent.unwrap_or(Decimal::ZERO);
        let categories = categories
            .into_iter()
            .map(|row| (row.category, row.total))
            .collect();

        Self {
            total_spent,
            categories,
            budget,
            remaining: budget - total_spent,
            is_over_budget: total_spent > budget,
        }
    }
}

/// Half-open range `[first day of month, first day of next month)` containing `today`.
pub fn month_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = today.with_day(1).unwrap_or(today);
    let end = if start.month() == 12 {
        NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
    }
    .unwrap_or(NaiveDate::MAX);

    (start, end)
}
