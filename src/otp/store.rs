//! Passcode persistence keyed by `(email, profile)`.

use crate::account::ProfileType;
use crate::error::StoreError;
use crate::otp::models::OneTimePasscode;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::Instrument;

/// Repository for live passcodes: get, upsert, delete. One record per owner
/// key, enforced by the table's primary key.
#[async_trait]
pub trait PasscodeStore: Send + Sync {
    async fn get(
        &self,
        email: &str,
        profile: ProfileType,
    ) -> Result<Option<OneTimePasscode>, StoreError>;
    async fn put(&self, passcode: &OneTimePasscode) -> Result<(), StoreError>;
    async fn delete(&self, email: &str, profile: ProfileType) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct PgPasscodeStore {
    pool: PgPool,
}

impl PgPasscodeStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PasscodeStore for PgPasscodeStore {
    async fn get(
        &self,
        email: &str,
        profile: ProfileType,
    ) -> Result<Option<OneTimePasscode>, StoreError> {
        let query = r"
            SELECT email, profile, code, expires_at, failed_attempts, blocked_until
            FROM passcodes
            WHERE email = $1 AND profile = $2
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let passcode = sqlx::query_as::<_, OneTimePasscode>(query)
            .bind(email)
            .bind(profile.as_str())
            .fetch_optional(&self.pool)
            .instrument(span)
            .await?;

        Ok(passcode)
    }

    async fn put(&self, passcode: &OneTimePasscode) -> Result<(), StoreError> {
        let query = r"
            INSERT INTO passcodes
                (email, profile, code, expires_at, failed_attempts, blocked_until)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (email, profile) DO UPDATE
            SET code = EXCLUDED.code,
                expires_at = EXCLUDED.expires_at,
                failed_attempts = EXCLUDED.failed_attempts,
                blocked_until = EXCLUDED.blocked_until
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        sqlx::query(query)
            .bind(&passcode.email)
            .bind(passcode.profile.as_str())
            .bind(&passcode.code)
            .bind(passcode.expires_at)
            .bind(passcode.failed_attempts)
            .bind(passcode.blocked_until)
            .execute(&self.pool)
            .instrument(span)
            .await?;

        Ok(())
    }

    async fn delete(&self, email: &str, profile: ProfileType) -> Result<(), StoreError> {
        let query = "DELETE FROM passcodes WHERE email = $1 AND profile = $2";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "DELETE",
            db.statement = query
        );
        sqlx::query(query)
            .bind(email)
            .bind(profile.as_str())
            .execute(&self.pool)
            .instrument(span)
            .await?;

        Ok(())
    }
}
