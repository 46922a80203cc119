//! OpenAPI document served at `/docs`.

use utoipa::OpenApi;

use crate::api::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ingresso",
        description = "OTP-gated login service: password + one-time-passcode authentication with lockout"
    ),
    paths(
        handlers::health::health,
        handlers::register::register,
        handlers::login::login,
        handlers::otp::generate_otp,
        handlers::otp::validate_otp,
        handlers::password::reset_password,
        handlers::password::forgot_password,
    ),
    components(schemas(
        handlers::ApiResponse,
        handlers::register::RegisterRequest,
        handlers::login::LoginRequest,
        handlers::otp::GenerateOtpRequest,
        handlers::otp::ValidateOtpRequest,
        handlers::password::ResetPasswordRequest,
        handlers::password::ForgotPasswordRequest,
        crate::account::ProfileType,
    )),
    tags(
        (name = "auth", description = "Registration, login and password resets"),
        (name = "otp", description = "One-time passcode generation and validation"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_auth_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/auth/register",
            "/auth/login",
            "/auth/generate-otp",
            "/auth/validate-otp",
            "/auth/reset-password",
            "/auth/forgot-password",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
