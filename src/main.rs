mod config;
mod database;
mod error;
mod handlers;
mod models;
mod reports;
mod repository;
mod utils;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::TraceLayer,
};
use dotenvy::dotenv;

use config::Config;
use database::{create_database_pool, run_migrations, Database};
use error::StartupError;

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    env_logger::init();

    let config = Config::from_env()?;

    let db = create_database_pool(&config).await?;
    run_migrations(&db).await?;

    let app = create_router(db);

    let addr = config.bind_addr();
    log::info!("Expense tracker starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn create_router(db: Database) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health))

        // Accounts
        .route("/auth/signup", post(handlers::auth::signup))
        .route("/auth/login", post(handlers::auth::login))

        // Expenses
        .route(
            "/expenses",
            get(handlers::expenses::expenses_list).post(handlers::expenses::create_expense),
        )
        .route(
            "/expenses/:id",
            put(handlers::expenses::update_expense).delete(handlers::expenses::delete_expense),
        )

        // Reports
        .route("/expenses/summary/monthly", get(handlers::reports::monthly_summary))
        .route("/expenses/export/excel", get(handlers::reports::export_excel))

        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
        )
        .with_state(db)
}
