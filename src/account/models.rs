//! Account entity and lockout invariants.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};
use utoipa::ToSchema;
use uuid::Uuid;

/// Consecutive failures (bad password or bad OTP) before an account locks.
pub const MAX_FAILED_ATTEMPTS: i32 = 3;

/// How long a locked account stays ineligible for login.
pub const LOCKOUT_HOURS: i64 = 24;

/// Profile category an account belongs to. The same email address may hold
/// one account per profile.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProfileType {
    Customer,
    Merchant,
    Delivery,
}

impl ProfileType {
    /// Textual form persisted in the `profile` columns.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "CUSTOMER",
            Self::Merchant => "MERCHANT",
            Self::Delivery => "DELIVERY",
        }
    }

    /// Parse the persisted textual value back into the typed enum.
    pub(crate) fn from_db(value: &str) -> Result<Self, sqlx::Error> {
        match value {
            "CUSTOMER" => Ok(Self::Customer),
            "MERCHANT" => Ok(Self::Merchant),
            "DELIVERY" => Ok(Self::Delivery),
            _ => Err(sqlx::Error::Decode(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("invalid profile value: {value}"),
            )))),
        }
    }
}

impl std::fmt::Display for ProfileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored credential + lockout state for one `(email, profile)` pair.
///
/// `password_hash` is an Argon2 PHC string; the clear password is never
/// stored or logged. `locked_until` is only ever set by the failed-attempt
/// counter reaching [`MAX_FAILED_ATTEMPTS`].
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub profile: ProfileType,
    pub password_hash: String,
    pub failed_attempts: i32,
    pub locked_until: Option<DateTime<Utc>>,
}

impl Account {
    #[must_use]
    pub fn new(email: String, profile: ProfileType, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            profile,
            password_hash,
            failed_attempts: 0,
            locked_until: None,
        }
    }

    /// A lock that has already elapsed no longer gates login; the counter is
    /// only cleared by the next success.
    #[must_use]
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.is_some_and(|until| until > now)
    }

    /// Record one failed login attempt. The third consecutive failure locks
    /// the account for [`LOCKOUT_HOURS`].
    pub fn register_failure(&mut self, now: DateTime<Utc>) {
        self.failed_attempts += 1;
        if self.failed_attempts >= MAX_FAILED_ATTEMPTS {
            self.locked_until = Some(now + Duration::hours(LOCKOUT_HOURS));
        }
    }

    /// Reset after a successful login or password change.
    pub fn clear_failures(&mut self) {
        self.failed_attempts = 0;
        self.locked_until = None;
    }
}

impl<'r> FromRow<'r, PgRow> for Account {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let profile: String = row.try_get("profile")?;
        Ok(Self {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            profile: ProfileType::from_db(&profile)?,
            password_hash: row.try_get("password_hash")?,
            failed_attempts: row.try_get("failed_attempts")?,
            locked_until: row.try_get("locked_until")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account::new(
            "a@x.com".to_string(),
            ProfileType::Customer,
            "$argon2id$stub".to_string(),
        )
    }

    #[test]
    fn new_account_starts_unlocked() {
        let account = account();
        assert_eq!(account.failed_attempts, 0);
        assert!(account.locked_until.is_none());
        assert!(!account.is_locked(Utc::now()));
    }

    #[test]
    fn third_failure_locks_for_24_hours() {
        let now = Utc::now();
        let mut account = account();

        account.register_failure(now);
        account.register_failure(now);
        assert!(account.locked_until.is_none());

        account.register_failure(now);
        assert_eq!(account.failed_attempts, 3);
        let until = account.locked_until.expect("third failure must lock");
        assert_eq!(until, now + Duration::hours(24));
        assert!(account.is_locked(now));
    }

    #[test]
    fn elapsed_lock_no_longer_gates_login() {
        let now = Utc::now();
        let mut account = account();
        account.failed_attempts = 3;
        account.locked_until = Some(now - Duration::minutes(1));

        assert!(!account.is_locked(now));
        // Counter survives until the next success clears it.
        assert_eq!(account.failed_attempts, 3);
    }

    #[test]
    fn clear_failures_resets_counter_and_lock() {
        let now = Utc::now();
        let mut account = account();
        for _ in 0..3 {
            account.register_failure(now);
        }

        account.clear_failures();
        assert_eq!(account.failed_attempts, 0);
        assert!(account.locked_until.is_none());
    }

    #[test]
    fn profile_round_trips_through_db_form() {
        for profile in [
            ProfileType::Customer,
            ProfileType::Merchant,
            ProfileType::Delivery,
        ] {
            assert_eq!(ProfileType::from_db(profile.as_str()).unwrap(), profile);
        }
        assert!(ProfileType::from_db("ADMIN").is_err());
    }

    #[test]
    fn profile_serializes_uppercase() {
        let json = serde_json::to_string(&ProfileType::Delivery).unwrap();
        assert_eq!(json, "\"DELIVERY\"");
        let parsed: ProfileType = serde_json::from_str("\"MERCHANT\"").unwrap();
        assert_eq!(parsed, ProfileType::Merchant);
    }
}
