use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Json},
};
use chrono::Local;
use serde::Deserialize;

use crate::{
    database::Database,
    error::{AppError, AppResult},
    reports::{build_report, month_bounds, MonthlySummary, REPORT_CONTENT_TYPE, REPORT_FILENAME},
    repository::{expenses, users},
};
use super::parse_date_param;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryQuery {
    user_id: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportQuery {
    user_id: i64,
    start_date: Option<String>,
    end_date: Option<String>,
}

pub async fn monthly_summary(
    State(db): State<Database>,
    Query(query): Query<SummaryQuery>,
) -> AppResult<Json<MonthlySummary>> {
    let user = users::find_user_by_id(&db, query.user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    let month = month_bounds(Local::now().date_naive());
    let total = expenses::month_total(&db, user.id, month).await?;
    let categories = expenses::month_category_totals(&db, user.id, month).await?;

    Ok(Json(MonthlySummary::new(user.monthly_budget, total, categories)))
}

pub async fn export_excel(
    State(db): State<Database>,
    Query(query): Query<ExportQuery>,
) -> AppResult<impl IntoResponse> {
    let start = parse_date_param(query.start_date.as_deref(), "startDate")?;
    let end = parse_date_param(query.end_date.as_deref(), "endDate")?;

    let list = match (start, end) {
        (Some(start), Some(end)) => {
            expenses::find_by_user_and_date_range(&db, query.user_id, start, end).await?
        }
        (None, None) => expenses::find_by_user(&db, query.user_id).await?,
        _ => {
            return Err(AppError::BadRequest(
                "startDate and endDate must be given together".into(),
            ))
        }
    };

    let bytes = build_report(&list)?;

    log::info!("Exported {} bytes of expenses for user {}", bytes.len(), query.user_id);

    Ok((
        [
            (header::CONTENT_TYPE, REPORT_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", REPORT_FILENAME),
            ),
        ],
        bytes,
    ))
}
