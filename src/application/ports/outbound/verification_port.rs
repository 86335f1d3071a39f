//! Verification port - One-time codes that prove control of an email address

use anyhow::Result;
use async_trait::async_trait;

/// Number of digits in a verification code
pub const VERIFICATION_CODE_LENGTH: usize = 6;

#[async_trait]
pub trait VerificationChannelPort: Send + Sync {
    /// Generate a fresh numeric code for `email` and deliver it.
    ///
    /// A new code replaces any earlier one for the same address.
    async fn send_code(&self, email: &str) -> Result<()>;

    /// Check a submitted code. A matching code is consumed.
    async fn verify_code(&self, email: &str, code: &str) -> Result<bool>;

    /// Drop expired codes, returning how many were removed
    async fn purge_expired(&self) -> usize;
}
