use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

use super::{error_reply, reply, valid_email};
use crate::account::{AuthService, ProfileType};

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub otp: String,
    pub profile: ProfileType,
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = super::ApiResponse),
        (status = 401, description = "Invalid credentials", body = super::ApiResponse),
        (status = 422, description = "Invalid OTP", body = super::ApiResponse),
        (status = 423, description = "Account locked after repeated failures", body = super::ApiResponse),
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn login(
    auth: Extension<Arc<AuthService>>,
    payload: Option<Json<LoginRequest>>,
) -> impl IntoResponse {
    let Some(Json(request)) = payload else {
        return reply(StatusCode::BAD_REQUEST, "Missing payload");
    };

    if !valid_email(&request.email) {
        return reply(StatusCode::BAD_REQUEST, "Invalid email format");
    }

    match auth
        .login(
            &request.email,
            request.profile,
            &request.password,
            &request.otp,
        )
        .await
    {
        Ok(()) => reply(StatusCode::OK, "Login successful!"),
        Err(err) => error_reply(&err),
    }
}
