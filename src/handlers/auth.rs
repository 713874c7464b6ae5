use axum::{
    extract::State,
    response::Json,
};
use rust_decimal::Decimal;

use crate::{
    database::Database,
    error::{conflict_on_duplicate, AppError, AppResult},
    models::{expense::fits_amount_column, LoginRequest, LoginResponse, SignupRequest, SignupResponse},
    repository::users,
    utils::{hash_password, verify_password},
};

const EMAIL_EXISTS: &str = "Email exists";

pub async fn signup(
    State(db): State<Database>,
    Json(request): Json<SignupRequest>,
) -> AppResult<Json<SignupResponse>> {
    let email = request.email.trim();
    if email.is_empty() || request.password.is_empty() {
        return Err(AppError::BadRequest("Email and password are required".into()));
    }

    let budget = request.monthly_budget.unwrap_or(Decimal::ZERO);
    if !fits_amount_column(budget) {
        return Err(AppError::BadRequest("Monthly budget is out of range".into()));
    }

    if users::email_exists(&db, email).await? {
        return Err(AppError::Conflict(EMAIL_EXISTS.into()));
    }

    let password_hash = hash_password(&request.password)?;

    // A concurrent signup can still win the race to the unique index.
    let user = users::insert_user(&db, email, &request.name, &password_hash, budget)
        .await
        .map_err(|e| conflict_on_duplicate(e, EMAIL_EXISTS))?;
    log::info!("Registered user {}", user.id);

    Ok(Json(SignupResponse::from(user)))
}

pub async fn login(
    State(db): State<Database>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let user = users::find_user_by_email(&db, request.email.trim())
        .await?
        .ok_or(AppError::NotFound("User"))?;

    if !verify_password(&request.password, &user.password_hash)? {
        return Err(AppError::Unauthorized("Wrong password".into()));
    }

    Ok(Json(LoginResponse::from(user)))
}
