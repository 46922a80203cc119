pub mod health;
pub use self::health::health;

pub mod register;
pub use self::register::register;

pub mod login;
pub use self::login::login;

pub mod otp;
pub use self::otp::{generate_otp, validate_otp};

pub mod password;
pub use self::password::{forgot_password, reset_password};

// common functions for the handlers
use crate::error::AuthError;
use axum::{http::StatusCode, response::Json};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

/// Response envelope every auth endpoint returns.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ApiResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub message: String,
}

pub fn reply(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<ApiResponse>) {
    (
        status,
        Json(ApiResponse {
            status_code: status.as_u16(),
            message: message.into(),
        }),
    )
}

/// Map a core failure to its HTTP reply. Operational kinds are logged here;
/// business outcomes are only reported to the caller.
pub fn error_reply(err: &AuthError) -> (StatusCode, Json<ApiResponse>) {
    match err {
        AuthError::Store(source) => error!("store failure: {source}"),
        AuthError::Notification(reason) => error!("notification failure: {reason}"),
        AuthError::Hash(reason) => error!("hashing failure: {reason}"),
        _ => {}
    }
    reply(err.status_code(), err.to_string())
}

pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").map_or(false, |re| re.is_match(email))
}

/// Registration and reset passwords must carry at least 8 characters.
pub fn valid_password(password: &str) -> bool {
    password.len() >= 8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation_rejects_malformed_addresses() {
        assert!(valid_email("a@x.com"));
        assert!(valid_email("first.last@sub.domain.org"));
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("spaces in@x.com"));
        assert!(!valid_email("missing@tld"));
    }

    #[test]
    fn password_validation_requires_eight_characters() {
        assert!(valid_password("pw123456"));
        assert!(!valid_password("short"));
    }

    #[test]
    fn error_reply_carries_status_and_message() {
        let (status, Json(body)) = error_reply(&AuthError::AccountLocked);
        assert_eq!(status, StatusCode::LOCKED);
        assert_eq!(body.status_code, 423);
        assert_eq!(body.message, "Account locked! Try again later.");
    }
}
