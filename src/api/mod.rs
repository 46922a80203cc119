//! HTTP surface: pool construction, service wiring and the axum router.
//!
//! The handlers are a thin controller layer — field validation and status
//! mapping only. All sequencing of password checks, OTP checks and lockout
//! lives in [`crate::account::AuthService`] and [`crate::otp::OtpService`].

use crate::account::{AuthService, PgAccountStore};
use crate::email::Mailer;
use crate::otp::{OtpService, PgPasscodeStore};
use crate::password::Hasher;
use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Extension, Router,
};
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod handlers;
mod openapi;

pub use openapi::ApiDoc;

/// Build the application router around already-constructed services.
pub fn router(auth: Arc<AuthService>, otp: Arc<OtpService>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/auth/generate-otp", post(handlers::generate_otp))
        .route("/auth/validate-otp", post(handlers::validate_otp))
        .route("/auth/reset-password", post(handlers::reset_password))
        .route("/auth/forgot-password", post(handlers::forgot_password))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(Extension(auth))
        .layer(Extension(otp))
        .layer(TraceLayer::new_for_http())
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, dsn: String, mailer: Arc<dyn Mailer>) -> Result<()> {
    // Connect to database; the pool is the only store client in the process
    // and is passed down explicitly.
    let pool = PgPoolOptions::new()
        .min_connections(1)
        .max_connections(5)
        .max_lifetime(Duration::from_secs(60 * 2))
        .test_before_acquire(true)
        .connect(&dsn)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!()
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let accounts = Arc::new(PgAccountStore::new(pool.clone()));
    let passcodes = Arc::new(PgPasscodeStore::new(pool));

    let otp = Arc::new(OtpService::new(passcodes, mailer.clone()));
    let auth = Arc::new(AuthService::new(accounts, otp.clone(), Hasher, mailer));

    let app = router(auth, otp);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;
    info!(port, "listening");

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
