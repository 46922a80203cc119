//! # Ingresso (OTP-gated login service)
//!
//! `ingresso` authenticates end users with a password plus a one-time
//! passcode (OTP) second factor, and manages account lockout and
//! password-reset flows gated by either the current password or a valid OTP.
//!
//! ## Accounts & profiles
//!
//! An account is scoped by `(email, profile)` where profile is one of
//! `CUSTOMER`, `MERCHANT`, `DELIVERY` — the same address may hold one
//! account per profile. Three consecutive failed login attempts (bad
//! password or bad OTP, in any mix) lock the account for 24 hours.
//!
//! ## One-time passcodes
//!
//! Each `(email, profile)` owns at most one live 6-digit passcode, valid
//! for 3 minutes. Three invalid validation attempts block the passcode for
//! 15 minutes; a successful validation consumes (deletes) it so it can
//! never be replayed.
//!
//! ## Collaborators
//!
//! Storage is Postgres behind `AccountStore`/`PasscodeStore` traits;
//! outbound mail goes through a single `Mailer` capability with
//! per-profile templates. Business outcomes (locked, invalid OTP, ...) are
//! typed error values, never panics.

pub mod account;
pub mod api;
pub mod cli;
pub mod email;
pub mod error;
pub mod otp;
pub mod password;

#[cfg(test)]
pub mod test_support;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(GIT_COMMIT_HASH.len() >= 7);
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
