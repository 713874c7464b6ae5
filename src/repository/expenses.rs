use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::{
    database::Database,
    models::{CategoryAmount, Expense, ExpenseFields},
};

const ORDER_BY: &str = "ORDER BY expense_date DESC NULLS LAST, id DESC";

pub async fn find_by_user(db: &Database, user_id: i64) -> Result<Vec<Expense>, sqlx::Error> {
    sqlx::query_as::<_, Expense>(&format!("SELECT * FROM expenses WHERE user_id = $1 {}", ORDER_BY))
        .bind(user_id)
        .fetch_all(db)
        .await
}

/// Both bounds are inclusive.
pub async fn find_by_user_and_date_range(
    db: &Database,
    user_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Expense>, sqlx::Error> {
    sqlx::query_as::<_, Expense>(&format!(
        "SELECT * FROM expenses WHERE user_id = $1 AND expense_date BETWEEN $2 AND $3 {}",
        ORDER_BY
    ))
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await
}

pub async fn find_by_user_and_category(
    db: &Database,
    user_id: i64,
    category: &str,
) -> Result<Vec<Expense>, sqlx::Error> {
    sqlx::query_as::<_, Expense>(&format!(
        "SELECT * FROM expenses WHERE user_id = $1 AND category = $2 {}",
        ORDER_BY
    ))
    .bind(user_id)
    .bind(category)
    .fetch_all(db)
    .await
}

/// Case-insensitive substring match on the title.
pub async fn find_by_user_and_title(
    db: &Database,
    user_id: i64,
    search: &str,
) -> Result<Vec<Expense>, sqlx::Error> {
    sqlx::query_as::<_, Expense>(&format!(
        "SELECT * FROM expenses WHERE user_id = $1 AND title ILIKE $2 {}",
        ORDER_BY
    ))
    .bind(user_id)
    .bind(like_pattern(search))
    .fetch_all(db)
    .await
}

pub async fn insert_expense(
    db: &Database,
    user_id: i64,
    fields: &ExpenseFields,
) -> Result<Expense, sqlx::Error> {
    sqlx::query_as::<_, Expense>(
        r#"
        INSERT INTO expenses (user_id, title, amount, category, payment_method, expense_date)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&fields.title)
    .bind(fields.amount)
    .bind(&fields.category)
    .bind(&fields.payment_method)
    .bind(fields.expense_date)
    .fetch_one(db)
    .await
}

/// Returns `None` when no expense has this id.
pub async fn update_expense(
    db: &Database,
    expense_id: i64,
    fields: &ExpenseFields,
) -> Result<Option<Expense>, sqlx::Error> {
    sqlx::query_as::<_, Expense>(
        r#"
        UPDATE expenses
        SET title = $1, amount = $2, category = $3, payment_method = $4, expense_date = $5
        WHERE id = $6
        RETURNING *
        "#,
    )
    .bind(&fields.title)
    .bind(fields.amount)
    .bind(&fields.category)
    .bind(&fields.payment_method)
    .bind(fields.expense_date)
    .bind(expense_id)
    .fetch_optional(db)
    .await
}

/// Returns whether a row was removed.
pub async fn delete_expense(db: &Database, expense_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM expenses WHERE id = $1")
        .bind(expense_id)
        .execute(db)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Sum of amounts in `[start, end)`; `None` when the user has no expenses there.
pub async fn month_total(
    db: &Database,
    user_id: i64,
    (start, end): (NaiveDate, NaiveDate),
) -> Result<Option<Decimal>, sqlx::Error> {
    sqlx::query_scalar::<_, Option<Decimal>>(
        "SELECT SUM(amount) FROM expenses WHERE user_id = $1 AND expense_date >= $2 AND expense_date < $3",
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_one(db)
    .await
}

pub async fn month_category_totals(
    db: &Database,
    user_id: i64,
    (start, end): (NaiveDate, NaiveDate),
) -> Result<Vec<CategoryAmount>, sqlx::Error> {
    sqlx::query_as::<_, CategoryAmount>(
        r#"
        SELECT category, SUM(amount) AS total
        FROM expenses
        WHERE user_id = $1 AND expense_date >= $2 AND expense_date < $3
        GROUP BY category
        ORDER BY category
        "#,
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await
}

// Escapes LIKE wildcards so the search text matches literally.
fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}
