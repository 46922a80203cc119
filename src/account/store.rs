//! Account persistence keyed by `(email, profile)`.

use crate::account::models::{Account, ProfileType};
use crate::error::StoreError;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::Instrument;

/// Key-value-by-identity repository for accounts. `put` is an upsert and is
/// the single atomic write for read-modify-write sequences; a lost update
/// surfaces as [`StoreError::Conflict`].
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn get(&self, email: &str, profile: ProfileType)
        -> Result<Option<Account>, StoreError>;
    async fn put(&self, account: &Account) -> Result<(), StoreError>;
}

/// Postgres-backed store. The pool is built once at startup and handed in
/// explicitly; there is no hidden global client.
#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn get(
        &self,
        email: &str,
        profile: ProfileType,
    ) -> Result<Option<Account>, StoreError> {
        let query = r"
            SELECT id, email, profile, password_hash, failed_attempts, locked_until
            FROM accounts
            WHERE email = $1 AND profile = $2
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let account = sqlx::query_as::<_, Account>(query)
            .bind(email)
            .bind(profile.as_str())
            .fetch_optional(&self.pool)
            .instrument(span)
            .await?;

        Ok(account)
    }

    async fn put(&self, account: &Account) -> Result<(), StoreError> {
        let query = r"
            INSERT INTO accounts
                (id, email, profile, password_hash, failed_attempts, locked_until)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (email, profile) DO UPDATE
            SET password_hash = EXCLUDED.password_hash,
                failed_attempts = EXCLUDED.failed_attempts,
                locked_until = EXCLUDED.locked_until
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        sqlx::query(query)
            .bind(account.id)
            .bind(&account.email)
            .bind(account.profile.as_str())
            .bind(&account.password_hash)
            .bind(account.failed_attempts)
            .bind(account.locked_until)
            .execute(&self.pool)
            .instrument(span)
            .await?;

        Ok(())
    }
}
