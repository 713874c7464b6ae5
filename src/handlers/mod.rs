pub mod auth;
pub mod expenses;
pub mod reports;

use axum::response::Json;
use chrono::NaiveDate;
use serde::Serialize;

use crate::error::AppError;

#[derive(Serialize)]
pub struct StatusResponse {
    status: &'static str,
    message: &'static str,
    endpoints: &'static str,
}

pub async fn home() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "running",
        message: "Expense Tracker API is live!",
        endpoints: "/auth, /expenses, /health",
    })
}

pub async fn health() -> &'static str {
    "OK"
}

// Empty strings from query forms count as "not given".
pub(crate) fn parse_date_param(value: Option<&str>, name: &str) -> Result<Option<NaiveDate>, AppError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("Invalid {}: {}", name, s))),
    }
}
