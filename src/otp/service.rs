//! OtpCoordinator: passcode generation, validation and blocking.

use crate::account::ProfileType;
use crate::email::{otp_message, Mailer};
use crate::error::{AuthError, StoreError};
use crate::otp::generator;
use crate::otp::models::{OneTimePasscode, MAX_FAILED_ATTEMPTS};
use crate::otp::store::PasscodeStore;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

/// Owns the passcode lifecycle: generate, resend (regenerate in place),
/// validate, block.
pub struct OtpService {
    store: Arc<dyn PasscodeStore>,
    mailer: Arc<dyn Mailer>,
}

impl OtpService {
    #[must_use]
    pub fn new(store: Arc<dyn PasscodeStore>, mailer: Arc<dyn Mailer>) -> Self {
        Self { store, mailer }
    }

    /// Generate (or regenerate) the passcode for an owner key and email it.
    ///
    /// A currently blocked record rejects the request without any state
    /// change or mail. Otherwise the record is overwritten in place — fresh
    /// code, fresh 3-minute expiry, attempts reset, block cleared — persisted
    /// first, then delivered. Exactly one mail goes out per successful call.
    ///
    /// # Errors
    /// `OtpBlocked` while the block stands, `Store` on persistence failure,
    /// `Notification` if the mailer rejects delivery (the stored code stays
    /// valid).
    pub async fn generate(&self, email: &str, profile: ProfileType) -> Result<String, AuthError> {
        let now = Utc::now();

        let passcode = match self.store.get(email, profile).await? {
            Some(mut existing) => {
                if existing.is_blocked(now) {
                    info!(%profile, "passcode generation rejected, owner key is blocked");
                    return Err(AuthError::OtpBlocked {
                        remaining_minutes: existing.blocked_minutes_remaining(now),
                    });
                }
                existing.regenerate(generator::six_digit_code(), now);
                existing
            }
            None => OneTimePasscode::new(
                email.to_string(),
                profile,
                generator::six_digit_code(),
                now,
            ),
        };

        self.put_with_retry(&passcode).await?;

        self.mailer
            .send(&otp_message(profile, email, &passcode.code))
            .await
            .map_err(|e| AuthError::Notification(e.to_string()))?;

        info!(%profile, "passcode generated and sent");
        Ok(format!("OTP sent successfully to {email}"))
    }

    /// Validate a supplied code against the stored passcode.
    ///
    /// Check order is fixed: absent, expired, blocked, then exact string
    /// comparison — so an expired-and-blocked record reports `OtpExpired`.
    /// An expired record is not deleted here; it lingers until regenerated.
    /// Success consumes the record (the only path that deletes one), so a
    /// code can never be replayed. A mismatch increments the attempt counter
    /// (the third sets a 15-minute block) and that write must stick or the
    /// whole call escalates to a store failure.
    ///
    /// # Errors
    /// `NotFound`, `OtpExpired`, `OtpBlocked`, `InvalidOtp` with the attempt
    /// count, or `Store` on persistence failure.
    pub async fn validate(
        &self,
        email: &str,
        profile: ProfileType,
        supplied: &str,
    ) -> Result<(), AuthError> {
        let now = Utc::now();

        let Some(mut passcode) = self.store.get(email, profile).await? else {
            return Err(AuthError::NotFound);
        };

        if passcode.is_expired(now) {
            return Err(AuthError::OtpExpired);
        }

        if passcode.is_blocked(now) {
            return Err(AuthError::OtpBlocked {
                remaining_minutes: passcode.blocked_minutes_remaining(now),
            });
        }

        if passcode.code == supplied {
            self.store.delete(email, profile).await?;
            info!(%profile, "passcode validated, record consumed");
            return Ok(());
        }

        passcode.register_failure(now);
        self.put_with_retry(&passcode).await?;
        info!(
            %profile,
            attempts = passcode.failed_attempts,
            "invalid passcode supplied"
        );

        Err(AuthError::InvalidOtp {
            attempts: passcode.failed_attempts,
            max: MAX_FAILED_ATTEMPTS,
        })
    }

    /// Upserts are retried exactly once on a transient store conflict;
    /// anything else escalates.
    async fn put_with_retry(&self, passcode: &OneTimePasscode) -> Result<(), AuthError> {
        match self.store.put(passcode).await {
            Err(StoreError::Conflict) => Ok(self.store.put(passcode).await?),
            other => Ok(other?),
        }
    }
}
