use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

use super::{error_reply, reply, valid_email, valid_password};
use crate::account::{AuthService, ProfileType};

/// Old-password-gated reset.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub profile: ProfileType,
    #[serde(rename = "oldPassword")]
    pub old_password: String,
    #[serde(rename = "newPassword")]
    pub new_password: String,
}

/// OTP-gated reset for users who forgot their password.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ForgotPasswordRequest {
    pub email: String,
    pub profile: ProfileType,
    pub otp: String,
    #[serde(rename = "newPassword")]
    pub new_password: String,
}

#[utoipa::path(
    post,
    path = "/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset successful", body = super::ApiResponse),
        (status = 404, description = "Email not registered", body = super::ApiResponse),
        (status = 422, description = "Old password incorrect", body = super::ApiResponse),
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn reset_password(
    auth: Extension<Arc<AuthService>>,
    payload: Option<Json<ResetPasswordRequest>>,
) -> impl IntoResponse {
    let Some(Json(request)) = payload else {
        return reply(StatusCode::BAD_REQUEST, "Missing payload");
    };

    if !valid_email(&request.email) {
        return reply(StatusCode::BAD_REQUEST, "Invalid email format");
    }
    if !valid_password(&request.new_password) {
        return reply(
            StatusCode::BAD_REQUEST,
            "Password must be at least 8 characters",
        );
    }

    match auth
        .change_password(
            &request.email,
            request.profile,
            &request.old_password,
            &request.new_password,
        )
        .await
    {
        Ok(()) => reply(StatusCode::OK, "Password reset successful!"),
        Err(err) => error_reply(&err),
    }
}

#[utoipa::path(
    post,
    path = "/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Password reset successful", body = super::ApiResponse),
        (status = 404, description = "Email not registered", body = super::ApiResponse),
        (status = 410, description = "OTP expired", body = super::ApiResponse),
        (status = 422, description = "Invalid OTP", body = super::ApiResponse),
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn forgot_password(
    auth: Extension<Arc<AuthService>>,
    payload: Option<Json<ForgotPasswordRequest>>,
) -> impl IntoResponse {
    let Some(Json(request)) = payload else {
        return reply(StatusCode::BAD_REQUEST, "Missing payload");
    };

    if !valid_email(&request.email) {
        return reply(StatusCode::BAD_REQUEST, "Invalid email format");
    }
    if !valid_password(&request.new_password) {
        return reply(
            StatusCode::BAD_REQUEST,
            "Password must be at least 8 characters",
        );
    }

    match auth
        .reset_password_with_otp(
            &request.email,
            request.profile,
            &request.otp,
            &request.new_password,
        )
        .await
    {
        Ok(()) => reply(StatusCode::OK, "Password reset successful!"),
        Err(err) => error_reply(&err),
    }
}
