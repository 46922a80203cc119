use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

use super::{error_reply, reply, valid_email, valid_password};
use crate::account::{AuthService, ProfileType, RegisterOutcome};

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub profile: ProfileType,
}

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = super::ApiResponse),
        (status = 400, description = "Malformed payload", body = super::ApiResponse),
        (status = 409, description = "Account already exists for this email and profile", body = super::ApiResponse),
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn register(
    auth: Extension<Arc<AuthService>>,
    payload: Option<Json<RegisterRequest>>,
) -> impl IntoResponse {
    let Some(Json(request)) = payload else {
        return reply(StatusCode::BAD_REQUEST, "Missing payload");
    };

    if !valid_email(&request.email) {
        return reply(StatusCode::BAD_REQUEST, "Invalid email format");
    }
    if !valid_password(&request.password) {
        return reply(
            StatusCode::BAD_REQUEST,
            "Password must be at least 8 characters",
        );
    }

    match auth
        .register(&request.email, request.profile, &request.password)
        .await
    {
        Ok(RegisterOutcome::Created) => {
            reply(StatusCode::CREATED, "User registered successfully!")
        }
        Ok(RegisterOutcome::AlreadyRegistered) => {
            reply(StatusCode::CONFLICT, "Email already registered!")
        }
        Err(err) => error_reply(&err),
    }
}
