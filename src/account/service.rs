//! AuthCoordinator: registration, login and password-reset orchestration.

use crate::account::models::Account;
use crate::account::store::AccountStore;
use crate::account::ProfileType;
use crate::email::{reset_confirmation, Mailer};
use crate::error::{AuthError, StoreError};
use crate::otp::OtpService;
use crate::password::Hasher;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

/// Registration is a reported business outcome, not an error.
#[derive(Debug, PartialEq, Eq)]
pub enum RegisterOutcome {
    Created,
    AlreadyRegistered,
}

/// Owns the account lifecycle and sequences password checks, OTP checks,
/// lockout application and password mutation per request.
pub struct AuthService {
    accounts: Arc<dyn AccountStore>,
    otp: Arc<OtpService>,
    hasher: Hasher,
    mailer: Arc<dyn Mailer>,
}

impl AuthService {
    #[must_use]
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        otp: Arc<OtpService>,
        hasher: Hasher,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            accounts,
            otp,
            hasher,
            mailer,
        }
    }

    /// Create an account for `(email, profile)` unless one already exists.
    ///
    /// # Errors
    /// `Store` on persistence failure, `Hash` if the password cannot be hashed.
    pub async fn register(
        &self,
        email: &str,
        profile: ProfileType,
        password: &str,
    ) -> Result<RegisterOutcome, AuthError> {
        if self.accounts.get(email, profile).await?.is_some() {
            warn!(%profile, "registration rejected, account already exists");
            return Ok(RegisterOutcome::AlreadyRegistered);
        }

        let account = Account::new(email.to_string(), profile, self.hasher.hash(password)?);
        self.accounts.put(&account).await?;

        info!(%profile, "account registered");
        Ok(RegisterOutcome::Created)
    }

    /// Password + OTP login.
    ///
    /// Order: account lookup, lock check (short-circuits before any OTP
    /// work), OTP validation, password verification. Either check failing
    /// applies the shared failed-attempt penalty — that write must itself
    /// succeed or the failure escalates to a store error. Full success resets
    /// the counter and clears any stale lock.
    ///
    /// # Errors
    /// `InvalidCredentials` (unknown account or wrong password),
    /// `AccountLocked`, the OTP failure kind from validation, `Store`.
    pub async fn login(
        &self,
        email: &str,
        profile: ProfileType,
        password: &str,
        otp_code: &str,
    ) -> Result<(), AuthError> {
        let Some(mut account) = self.accounts.get(email, profile).await? else {
            warn!(%profile, "login rejected, account not found");
            return Err(AuthError::InvalidCredentials);
        };

        if account.is_locked(Utc::now()) {
            warn!(%profile, "login rejected, account locked");
            return Err(AuthError::AccountLocked);
        }

        if let Err(err) = self.otp.validate(email, profile, otp_code).await {
            return match err {
                AuthError::Store(_) | AuthError::Hash(_) | AuthError::Notification(_) => Err(err),
                business => {
                    self.apply_penalty(&mut account).await?;
                    warn!(%profile, "login rejected, OTP check failed");
                    Err(business)
                }
            };
        }

        if !self.hasher.verify(password, &account.password_hash)? {
            self.apply_penalty(&mut account).await?;
            warn!(%profile, "login rejected, wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        account.clear_failures();
        self.put_with_retry(&account).await?;

        info!(%profile, "login successful");
        Ok(())
    }

    /// Old-password-gated password change. A wrong old password carries no
    /// lockout penalty — unlike login failures.
    ///
    /// # Errors
    /// `NotFound`, `OldPasswordIncorrect`, `Store`, `Hash`.
    pub async fn change_password(
        &self,
        email: &str,
        profile: ProfileType,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let Some(mut account) = self.accounts.get(email, profile).await? else {
            return Err(AuthError::NotFound);
        };

        if !self.hasher.verify(old_password, &account.password_hash)? {
            warn!(%profile, "password change rejected, old password mismatch");
            return Err(AuthError::OldPasswordIncorrect);
        }

        account.password_hash = self.hasher.hash(new_password)?;
        account.clear_failures();
        self.put_with_retry(&account).await?;

        info!(%profile, "password changed");
        Ok(())
    }

    /// OTP-gated password reset (forgot-password flow).
    ///
    /// An OTP failure propagates verbatim and never touches the account's
    /// lockout state. On success the new hash is persisted before the
    /// confirmation mail goes out, so a delivery failure reports
    /// `Notification` with the reset already applied.
    ///
    /// # Errors
    /// `NotFound`, any OTP failure kind, `Store`, `Hash`, `Notification`.
    pub async fn reset_password_with_otp(
        &self,
        email: &str,
        profile: ProfileType,
        otp_code: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let Some(mut account) = self.accounts.get(email, profile).await? else {
            return Err(AuthError::NotFound);
        };

        self.otp.validate(email, profile, otp_code).await?;

        account.password_hash = self.hasher.hash(new_password)?;
        account.clear_failures();
        self.put_with_retry(&account).await?;
        info!(%profile, "password reset via OTP");

        self.mailer
            .send(&reset_confirmation(profile, email))
            .await
            .map_err(|e| AuthError::Notification(e.to_string()))?;

        Ok(())
    }

    /// Shared penalty for failed OTP and password checks: increment the
    /// counter (the third failure locks for 24 hours) and persist. A
    /// transient conflict is resolved by re-reading and re-applying once.
    async fn apply_penalty(&self, account: &mut Account) -> Result<(), AuthError> {
        account.register_failure(Utc::now());

        match self.accounts.put(account).await {
            Err(StoreError::Conflict) => {
                let Some(mut fresh) = self
                    .accounts
                    .get(&account.email, account.profile)
                    .await?
                else {
                    return Err(AuthError::Store(StoreError::Conflict));
                };
                fresh.register_failure(Utc::now());
                self.accounts.put(&fresh).await?;
                Ok(())
            }
            other => Ok(other?),
        }
    }

    async fn put_with_retry(&self, account: &Account) -> Result<(), AuthError> {
        match self.accounts.put(account).await {
            Err(StoreError::Conflict) => Ok(self.accounts.put(account).await?),
            other => Ok(other?),
        }
    }
}
