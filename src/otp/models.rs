//! One-time passcode entity: expiry and anti-brute-force blocking.

use crate::account::ProfileType;
use chrono::{DateTime, Duration, Utc};
use sqlx::{postgres::PgRow, FromRow, Row};

/// Invalid validation attempts before the passcode blocks.
pub const MAX_FAILED_ATTEMPTS: i32 = 3;

/// How long generation and validation stay rejected once blocked.
pub const BLOCK_MINUTES: i64 = 15;

/// Lifetime of a freshly generated code.
pub const EXPIRY_MINUTES: i64 = 3;

/// At most one live passcode exists per `(email, profile)` owner key.
///
/// A passcode is consumed (deleted) exactly on successful validation, so a
/// code can never be replayed. An expired record is not auto-deleted; it
/// lingers until regenerated or validated away.
#[derive(Debug, Clone)]
pub struct OneTimePasscode {
    pub email: String,
    pub profile: ProfileType,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub failed_attempts: i32,
    pub blocked_until: Option<DateTime<Utc>>,
}

impl OneTimePasscode {
    #[must_use]
    pub fn new(email: String, profile: ProfileType, code: String, now: DateTime<Utc>) -> Self {
        Self {
            email,
            profile,
            code,
            expires_at: now + Duration::minutes(EXPIRY_MINUTES),
            failed_attempts: 0,
            blocked_until: None,
        }
    }

    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    #[must_use]
    pub fn is_blocked(&self, now: DateTime<Utc>) -> bool {
        self.blocked_until.is_some_and(|until| until > now)
    }

    /// Whole minutes left on the block, rounded up; 0 when not blocked.
    #[must_use]
    pub fn blocked_minutes_remaining(&self, now: DateTime<Utc>) -> i64 {
        match self.blocked_until {
            Some(until) if until > now => {
                let seconds = (until - now).num_seconds();
                (seconds + 59) / 60
            }
            _ => 0,
        }
    }

    /// Overwrite the code in place: fresh expiry, attempts reset, block
    /// cleared. Only an explicit regeneration resets these fields.
    pub fn regenerate(&mut self, code: String, now: DateTime<Utc>) {
        self.code = code;
        self.expires_at = now + Duration::minutes(EXPIRY_MINUTES);
        self.failed_attempts = 0;
        self.blocked_until = None;
    }

    /// Record one invalid validation attempt. The third sets the block.
    pub fn register_failure(&mut self, now: DateTime<Utc>) {
        self.failed_attempts += 1;
        if self.failed_attempts >= MAX_FAILED_ATTEMPTS {
            self.blocked_until = Some(now + Duration::minutes(BLOCK_MINUTES));
        }
    }
}

impl<'r> FromRow<'r, PgRow> for OneTimePasscode {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let profile: String = row.try_get("profile")?;
        Ok(Self {
            email: row.try_get("email")?,
            profile: ProfileType::from_db(&profile)?,
            code: row.try_get("code")?,
            expires_at: row.try_get("expires_at")?,
            failed_attempts: row.try_get("failed_attempts")?,
            blocked_until: row.try_get("blocked_until")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passcode(now: DateTime<Utc>) -> OneTimePasscode {
        OneTimePasscode::new(
            "a@x.com".to_string(),
            ProfileType::Customer,
            "123456".to_string(),
            now,
        )
    }

    #[test]
    fn fresh_passcode_expires_in_three_minutes() {
        let now = Utc::now();
        let otp = passcode(now);
        assert_eq!(otp.expires_at, now + Duration::minutes(3));
        assert!(!otp.is_expired(now));
        assert!(otp.is_expired(now + Duration::minutes(3) + Duration::seconds(1)));
    }

    #[test]
    fn third_failure_blocks_for_15_minutes() {
        let now = Utc::now();
        let mut otp = passcode(now);

        otp.register_failure(now);
        otp.register_failure(now);
        assert!(otp.blocked_until.is_none());

        otp.register_failure(now);
        assert_eq!(otp.blocked_until, Some(now + Duration::minutes(15)));
        assert!(otp.is_blocked(now));
        assert!(!otp.is_blocked(now + Duration::minutes(16)));
    }

    #[test]
    fn blocked_minutes_round_up() {
        let now = Utc::now();
        let mut otp = passcode(now);
        otp.blocked_until = Some(now + Duration::seconds(61));
        assert_eq!(otp.blocked_minutes_remaining(now), 2);
        assert_eq!(otp.blocked_minutes_remaining(now + Duration::minutes(2)), 0);
    }

    #[test]
    fn regenerate_resets_attempts_and_clears_block() {
        let now = Utc::now();
        let mut otp = passcode(now);
        for _ in 0..3 {
            otp.register_failure(now);
        }

        let later = now + Duration::minutes(20);
        otp.regenerate("654321".to_string(), later);

        assert_eq!(otp.code, "654321");
        assert_eq!(otp.failed_attempts, 0);
        assert!(otp.blocked_until.is_none());
        assert_eq!(otp.expires_at, later + Duration::minutes(3));
    }
}
