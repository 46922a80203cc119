//! Error taxonomy for the login core.
//!
//! Expected business outcomes (locked account, invalid OTP, wrong old
//! password, ...) are `AuthError` values returned to the caller; only store
//! unavailability and notification delivery are operational/transient kinds.

use axum::http::StatusCode;
use thiserror::Error;

/// Failures surfaced by the account and passcode stores.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Lost-update race on a read-modify-write sequence; callers may retry once.
    #[error("conflicting concurrent update")]
    Conflict,
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        // Postgres serialization_failure means our read-modify-write lost a race.
        if let sqlx::Error::Database(ref db) = err {
            if db.code().as_deref() == Some("40001") {
                return Self::Conflict;
            }
        }
        Self::Unavailable(Box::new(err))
    }
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Email not registered!")]
    NotFound,

    #[error("Invalid credentials!")]
    InvalidCredentials,

    #[error("Account locked! Try again later.")]
    AccountLocked,

    #[error("Invalid OTP. Attempt {attempts} of {max}.")]
    InvalidOtp { attempts: i32, max: i32 },

    #[error("OTP has expired.")]
    OtpExpired,

    #[error("You are blocked from using OTP. Try again after {remaining_minutes} minutes.")]
    OtpBlocked { remaining_minutes: i64 },

    #[error("Old password is incorrect!")]
    OldPasswordIncorrect,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to send notification: {0}")]
    Notification(String),

    #[error("Password hashing failed: {0}")]
    Hash(String),
}

impl AuthError {
    /// Status mapping used by the HTTP handlers; business kinds keep the
    /// statuses the auth controller has always reported.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::AccountLocked => StatusCode::LOCKED,
            Self::InvalidOtp { .. } | Self::OldPasswordIncorrect => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::OtpExpired => StatusCode::GONE,
            Self::OtpBlocked { .. } => StatusCode::FORBIDDEN,
            Self::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Notification(_) => StatusCode::BAD_GATEWAY,
            Self::Hash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_kinds_map_to_client_statuses() {
        assert_eq!(AuthError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::AccountLocked.status_code(), StatusCode::LOCKED);
        assert_eq!(
            AuthError::InvalidOtp {
                attempts: 1,
                max: 3
            }
            .status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(AuthError::OtpExpired.status_code(), StatusCode::GONE);
        assert_eq!(
            AuthError::OtpBlocked {
                remaining_minutes: 15
            }
            .status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn operational_kinds_map_to_server_statuses() {
        assert_eq!(
            AuthError::Store(StoreError::Conflict).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AuthError::Notification("smtp down".to_string()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn invalid_otp_reports_attempt_count() {
        let err = AuthError::InvalidOtp {
            attempts: 2,
            max: 3,
        };
        assert_eq!(err.to_string(), "Invalid OTP. Attempt 2 of 3.");
    }
}
