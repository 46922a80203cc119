//! Shared in-memory fixtures for coordinator tests.

use crate::account::models::{Account, ProfileType};
use crate::email::{EmailMessage, Mailer};
use crate::error::StoreError;
use crate::otp::models::OneTimePasscode;
use crate::otp::store::PasscodeStore;
use anyhow::anyhow;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::account::store::AccountStore;

fn unavailable() -> StoreError {
    StoreError::Unavailable(Box::new(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "injected store outage",
    )))
}

/// In-memory account store with injectable put failures.
#[derive(Default)]
pub struct MemAccountStore {
    records: Mutex<HashMap<(String, ProfileType), Account>>,
    fail_next_put: AtomicBool,
    conflict_next_put: AtomicBool,
}

impl MemAccountStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_record(&self, email: &str, profile: ProfileType) -> Option<Account> {
        self.records
            .lock()
            .unwrap()
            .get(&(email.to_string(), profile))
            .cloned()
    }

    pub fn update_record(&self, email: &str, profile: ProfileType, f: impl FnOnce(&mut Account)) {
        let mut records = self.records.lock().unwrap();
        let account = records
            .get_mut(&(email.to_string(), profile))
            .expect("record to update");
        f(account);
    }

    /// The next `put` fails as unavailable.
    pub fn fail_next_put(&self) {
        self.fail_next_put.store(true, Ordering::SeqCst);
    }

    /// The next `put` reports a lost-update conflict.
    pub fn conflict_next_put(&self) {
        self.conflict_next_put.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl AccountStore for MemAccountStore {
    async fn get(
        &self,
        email: &str,
        profile: ProfileType,
    ) -> Result<Option<Account>, StoreError> {
        Ok(self.get_record(email, profile))
    }

    async fn put(&self, account: &Account) -> Result<(), StoreError> {
        if self.fail_next_put.swap(false, Ordering::SeqCst) {
            return Err(unavailable());
        }
        if self.conflict_next_put.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Conflict);
        }
        self.records
            .lock()
            .unwrap()
            .insert((account.email.clone(), account.profile), account.clone());
        Ok(())
    }
}

/// In-memory passcode store with injectable put failures.
#[derive(Default)]
pub struct MemPasscodeStore {
    records: Mutex<HashMap<(String, ProfileType), OneTimePasscode>>,
    fail_next_put: AtomicBool,
    conflict_next_put: AtomicBool,
}

impl MemPasscodeStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_record(&self, email: &str, profile: ProfileType) -> Option<OneTimePasscode> {
        self.records
            .lock()
            .unwrap()
            .get(&(email.to_string(), profile))
            .cloned()
    }

    pub fn update_record(
        &self,
        email: &str,
        profile: ProfileType,
        f: impl FnOnce(&mut OneTimePasscode),
    ) {
        let mut records = self.records.lock().unwrap();
        let passcode = records
            .get_mut(&(email.to_string(), profile))
            .expect("record to update");
        f(passcode);
    }

    pub fn fail_next_put(&self) {
        self.fail_next_put.store(true, Ordering::SeqCst);
    }

    pub fn conflict_next_put(&self) {
        self.conflict_next_put.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl PasscodeStore for MemPasscodeStore {
    async fn get(
        &self,
        email: &str,
        profile: ProfileType,
    ) -> Result<Option<OneTimePasscode>, StoreError> {
        Ok(self.get_record(email, profile))
    }

    async fn put(&self, passcode: &OneTimePasscode) -> Result<(), StoreError> {
        if self.fail_next_put.swap(false, Ordering::SeqCst) {
            return Err(unavailable());
        }
        if self.conflict_next_put.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Conflict);
        }
        self.records
            .lock()
            .unwrap()
            .insert((passcode.email.clone(), passcode.profile), passcode.clone());
        Ok(())
    }

    async fn delete(&self, email: &str, profile: ProfileType) -> Result<(), StoreError> {
        self.records
            .lock()
            .unwrap()
            .remove(&(email.to_string(), profile));
        Ok(())
    }
}

/// Captures every message instead of delivering it.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
}

impl RecordingMailer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &EmailMessage) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Rejects every message, for `Notification` error paths.
pub struct SinkholeMailer;

#[async_trait]
impl Mailer for SinkholeMailer {
    async fn send(&self, _message: &EmailMessage) -> anyhow::Result<()> {
        Err(anyhow!("mail relay unreachable"))
    }
}
