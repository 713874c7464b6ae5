use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub amount: Decimal,
    pub category: String,
    pub payment_method: String,
    pub expense_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpense {
    pub user_id: i64,
    #[serde(flatten)]
    pub fields: ExpenseFields,
}

// Editable columns, shared by create and update.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseFields {
    pub title: String,
    pub amount: Decimal,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub expense_date: Option<NaiveDate>,
}

// Money columns are NUMERIC(12, 2).
const AMOUNT_LIMIT: i64 = 10_000_000_000;

/// Whether `amount` can be stored in a money column once Postgres rounds it to cents.
pub fn fits_amount_column(amount: Decimal) -> bool {
    amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .abs()
        < Decimal::from(AMOUNT_LIMIT)
}

/// Summed amount for one category label, as returned by the aggregate query.
#[derive(Debug, Clone, FromRow)]
pub struct CategoryAmount {
    pub category: String,
    pub total: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_fits_amount_column() {
        assert!(fits_amount_column(Decimal::from_str("3.50").unwrap()));
        assert!(fits_amount_column(Decimal::from_str("-42.10").unwrap()));
        assert!(fits_amount_column(Decimal::from_str("9999999999.99").unwrap()));
        assert!(!fits_amount_column(Decimal::from_str("9999999999.995").unwrap()));
        assert!(!fits_amount_column(Decimal::from_str("10000000000").unwrap()));
        assert!(!fits_amount_column(Decimal::from_str("-12345678901.5").unwrap()));
    }
}
