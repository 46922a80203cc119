use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

use super::{error_reply, reply, valid_email};
use crate::account::ProfileType;
use crate::otp::OtpService;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct GenerateOtpRequest {
    pub email: String,
    pub profile: ProfileType,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ValidateOtpRequest {
    pub email: String,
    pub otp: String,
    pub profile: ProfileType,
}

#[utoipa::path(
    post,
    path = "/auth/generate-otp",
    request_body = GenerateOtpRequest,
    responses(
        (status = 200, description = "OTP generated and sent", body = super::ApiResponse),
        (status = 403, description = "OTP generation blocked after repeated failures", body = super::ApiResponse),
        (status = 502, description = "Delivery failed", body = super::ApiResponse),
    ),
    tag = "otp"
)]
#[instrument(skip_all)]
pub async fn generate_otp(
    otp: Extension<Arc<OtpService>>,
    payload: Option<Json<GenerateOtpRequest>>,
) -> impl IntoResponse {
    let Some(Json(request)) = payload else {
        return reply(StatusCode::BAD_REQUEST, "Missing payload");
    };

    if !valid_email(&request.email) {
        return reply(StatusCode::BAD_REQUEST, "Invalid email format");
    }

    match otp.generate(&request.email, request.profile).await {
        Ok(confirmation) => reply(StatusCode::OK, confirmation),
        Err(err) => error_reply(&err),
    }
}

#[utoipa::path(
    post,
    path = "/auth/validate-otp",
    request_body = ValidateOtpRequest,
    responses(
        (status = 200, description = "OTP validated and consumed", body = super::ApiResponse),
        (status = 404, description = "No OTP found for this email and profile", body = super::ApiResponse),
        (status = 410, description = "OTP expired", body = super::ApiResponse),
        (status = 422, description = "Invalid OTP", body = super::ApiResponse),
    ),
    tag = "otp"
)]
#[instrument(skip_all)]
pub async fn validate_otp(
    otp: Extension<Arc<OtpService>>,
    payload: Option<Json<ValidateOtpRequest>>,
) -> impl IntoResponse {
    let Some(Json(request)) = payload else {
        return reply(StatusCode::BAD_REQUEST, "Missing payload");
    };

    if !valid_email(&request.email) {
        return reply(StatusCode::BAD_REQUEST, "Invalid email format");
    }

    match otp
        .validate(&request.email, request.profile, &request.otp)
        .await
    {
        Ok(()) => reply(StatusCode::OK, "OTP validated successfully"),
        Err(err) => error_reply(&err),
    }
}
