//! Expense reports.
//!
//! `ExpenseReport` materializes the three tables of the downloadable
//! spreadsheet from a list of expenses; `workbook` renders them to xlsx
//! bytes. `monthly` holds the budget summary shown for the current month.

pub mod monthly;
pub mod workbook;

use std::collections::{BTreeMap, HashMap};

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::Expense;

pub use monthly::{month_bounds, MonthlySummary};
pub use workbook::{build_report, REPORT_CONTENT_TYPE, REPORT_FILENAME};

/// One line of the detail sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailRow {
    pub id: i64,
    pub title: String,
    pub amount: String,
    pub category: String,
    pub payment_method: String,
    pub date: String,
}

/// One line of a grouped summary sheet (by category or by month).
#[derive(Debug, Clone, PartialEq)]
pub struct GroupRow {
    pub label: String,
    pub total: String,
    pub count: usize,
}

/// The three tables behind the spreadsheet report.
///
/// Row order:
/// - `detail` follows the input order.
/// - `categories` follows the order in which each category is first seen.
/// - `months` is ascending by "YYYY-MM"; expenses without a date are left out.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseReport {
    pub detail: Vec<DetailRow>,
    /// Sum of every amount, present only when there is at least one expense.
    pub total: Option<String>,
    pub categories: Vec<GroupRow>,
    pub months: Vec<GroupRow>,
}

#[derive(Default)]
struct Tally {
    total: Decimal,
    count: usize,
}

impl Tally {
    fn add(&mut self, amount: Decimal) {
        self.total += amount;
        self.count += 1;
    }

    fn into_row(self, label: String) -> GroupRow {
        GroupRow {
            label,
            total: format_amount(self.total),
            count: self.count,
        }
    }
}

impl ExpenseReport {
    pub fn from_expenses(expenses: &[Expense]) -> Self {
        let detail = expenses
            .iter()
            .map(|e| DetailRow {
                id: e.id,
                title: e.title.clone(),
                amount: format_amount(e.amount),
                category: e.category.clone(),
                payment_method: e.payment_method.clone(),
                date: e.expense_date.map(|d| d.to_string()).unwrap_or_default(),
            })
            .collect();

        let total = if expenses.is_empty() {
            None
        } else {
            Some(format_amount(expenses.iter().map(|e| e.amount).sum()))
        };

        Self {
            detail,
            total,
            categories: group_by_category(expenses),
            months: group_by_month(expenses),
        }
    }
}

fn group_by_category(expenses: &[Expense]) -> Vec<GroupRow> {
    let mut order: Vec<String> = Vec::new();
    let mut tallies: HashMap<&str, Tally> = HashMap::new();

    for expense in expenses {
        let tally = tallies.entry(expense.category.as_str()).or_insert_with(|| {
            order.push(expense.category.clone());
            Tally::default()
        });
        tally.add(expense.amount);
    }

    order
        .into_iter()
        .map(|label| {
            let tally = tallies.remove(label.as_str()).unwrap_or_default();
            tally.into_row(label)
        })
        .collect()
}

fn group_by_month(expenses: &[Expense]) -> Vec<GroupRow> {
    let mut tallies: BTreeMap<String, Tally> = BTreeMap::new();

    for expense in expenses {
        if let Some(date) = expense.expense_date {
            tallies
                .entry(date.format("%Y-%m").to_string())
                .or_default()
                .add(expense.amount);
        }
    }

    tallies
        .into_iter()
        .map(|(label, tally)| tally.into_row(label))
        .collect()
}

/// Formats an amount with exactly two decimal places, rounding half to even.
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(2);
    rounded.to_string()
}
