use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    database::Database,
    error::{AppError, AppResult},
    models::{expense::fits_amount_column, CreateExpense, Expense, ExpenseFields},
    repository::{expenses, users},
};
use super::parse_date_param;

// Dates arrive as optional strings so empty form fields don't fail extraction.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseFilters {
    user_id: i64,
    category: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    search: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

pub async fn expenses_list(
    State(db): State<Database>,
    Query(filters): Query<ExpenseFilters>,
) -> AppResult<Json<Vec<Expense>>> {
    let start = parse_date_param(filters.start_date.as_deref(), "startDate")?;
    let end = parse_date_param(filters.end_date.as_deref(), "endDate")?;

    // Only one filter applies: date range, then category, then title search.
    let list = if let (Some(start), Some(end)) = (start, end) {
        expenses::find_by_user_and_date_range(&db, filters.user_id, start, end).await?
    } else if let Some(category) = non_empty(&filters.category) {
        expenses::find_by_user_and_category(&db, filters.user_id, category).await?
    } else if let Some(search) = non_empty(&filters.search) {
        expenses::find_by_user_and_title(&db, filters.user_id, search).await?
    } else {
        expenses::find_by_user(&db, filters.user_id).await?
    };

    Ok(Json(list))
}

pub async fn create_expense(
    State(db): State<Database>,
    Json(request): Json<CreateExpense>,
) -> AppResult<Json<Expense>> {
    validate(&request.fields)?;

    if users::find_user_by_id(&db, request.user_id).await?.is_none() {
        return Err(AppError::NotFound("User"));
    }

    let expense = expenses::insert_expense(&db, request.user_id, &request.fields).await?;
    Ok(Json(expense))
}

pub async fn update_expense(
    State(db): State<Database>,
    Path(expense_id): Path<i64>,
    Json(fields): Json<ExpenseFields>,
) -> AppResult<Json<Expense>> {
    validate(&fields)?;

    let expense = expenses::update_expense(&db, expense_id, &fields)
        .await?
        .ok_or(AppError::NotFound("Expense"))?;

    Ok(Json(expense))
}

pub async fn delete_expense(
    State(db): State<Database>,
    Path(expense_id): Path<i64>,
) -> AppResult<Json<Value>> {
    if !expenses::delete_expense(&db, expense_id).await? {
        return Err(AppError::NotFound("Expense"));
    }

    Ok(Json(json!({ "message": "Expense deleted successfully" })))
}

fn validate(fields: &ExpenseFields) -> AppResult<()> {
    if fields.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title is required".into()));
    }
    if !fits_amount_column(fields.amount) {
        return Err(AppError::BadRequest("Amount is out of range".into()));
    }
    Ok(())
}
