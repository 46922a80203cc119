//! Outbound mail: one `Mailer` capability plus per-profile templates.
//!
//! The original service grew three near-identical "send OTP" methods, one per
//! profile category; here a single template lookup is parameterized by
//! [`ProfileType`] instead. Delivery is abstracted behind the `Mailer` trait:
//! `LogMailer` logs and succeeds (local dev, tests), `HttpMailer` posts JSON
//! to a mail relay endpoint.

use crate::account::ProfileType;
use crate::otp::models::EXPIRY_MINUTES;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::info;

#[derive(Clone, Debug)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Mail delivery abstraction used by the OTP and reset flows.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a message or return an error to surface as `Notification`.
    async fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// Local dev sender that logs the destination instead of sending real email.
#[derive(Clone, Debug)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        // The body carries the code; log only destination and subject.
        info!(to = %message.to, subject = %message.subject, "mail send stub");
        Ok(())
    }
}

/// Delivers through an HTTP mail relay (JSON POST, optional bearer token).
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    token: Option<SecretString>,
}

impl HttpMailer {
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(endpoint: String, token: Option<SecretString>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .build()
            .context("failed to build mail relay client")?;
        Ok(Self {
            client,
            endpoint,
            token,
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        let mut request = self.client.post(&self.endpoint).json(&json!({
            "to": message.to,
            "subject": message.subject,
            "body": message.body,
        }));

        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request
            .send()
            .await
            .context("mail relay request failed")?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(anyhow!("mail relay rejected message: {}", response.status()))
        }
    }
}

fn profile_noun(profile: ProfileType) -> &'static str {
    match profile {
        ProfileType::Customer => "customer",
        ProfileType::Merchant => "merchant",
        ProfileType::Delivery => "delivery partner",
    }
}

/// OTP delivery message for the given profile category.
#[must_use]
pub fn otp_message(profile: ProfileType, to: &str, code: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: "Your one-time passcode".to_string(),
        body: format!(
            "Use code {code} to sign in to your {} account. It expires in {EXPIRY_MINUTES} minutes.",
            profile_noun(profile)
        ),
    }
}

/// Confirmation sent after an OTP-gated password reset.
#[must_use]
pub fn reset_confirmation(profile: ProfileType, to: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: "Your password was reset".to_string(),
        body: format!(
            "The password for your {} account was just reset. If this wasn't you, contact support immediately.",
            profile_noun(profile)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otp_template_varies_by_profile() {
        let customer = otp_message(ProfileType::Customer, "a@x.com", "123456");
        let delivery = otp_message(ProfileType::Delivery, "a@x.com", "123456");

        assert_eq!(customer.to, "a@x.com");
        assert!(customer.body.contains("123456"));
        assert!(customer.body.contains("customer account"));
        assert!(delivery.body.contains("delivery partner account"));
        assert!(customer.body.contains("3 minutes"));
    }

    #[test]
    fn reset_confirmation_names_the_profile() {
        let message = reset_confirmation(ProfileType::Merchant, "m@x.com");
        assert_eq!(message.subject, "Your password was reset");
        assert!(message.body.contains("merchant account"));
    }

    #[tokio::test]
    async fn log_mailer_always_succeeds() {
        let message = otp_message(ProfileType::Customer, "a@x.com", "000000");
        assert!(LogMailer.send(&message).await.is_ok());
    }
}
