//! Email verification codes
//!
//! Codes live in memory with a TTL. Delivery goes through a mail relay
//! webhook; without one configured the code is written to the log so a
//! local setup can still register accounts.

use std::collections::HashMap;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use reqwest::Client;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::application::ports::outbound::{VerificationChannelPort, VERIFICATION_CODE_LENGTH};

/// Wrong guesses allowed before a code is thrown away
const MAX_CODE_ATTEMPTS: u32 = 5;

struct PendingCode {
    code: String,
    expires_at: DateTime<Utc>,
    failed_attempts: u32,
}

#[derive(Serialize)]
struct MailRequest<'a> {
    to: &'a str,
    subject: &'a str,
    text: String,
}

pub struct EmailVerificationChannel {
    client: Client,
    webhook_url: Option<String>,
    ttl: Duration,
    codes: RwLock<HashMap<String, PendingCode>>,
}

impl EmailVerificationChannel {
    pub fn new(webhook_url: Option<String>, ttl: Duration) -> Self {
        Self {
            client: Client::new(),
            webhook_url: webhook_url.map(|url| url.trim_end_matches('/').to_string()),
            ttl,
            codes: RwLock::new(HashMap::new()),
        }
    }

    fn generate_code() -> String {
        let upper = 10u32.pow(VERIFICATION_CODE_LENGTH as u32);
        let value = rand::thread_rng().gen_range(0..upper);
        format!("{:0width$}", value, width = VERIFICATION_CODE_LENGTH)
    }

    async fn deliver(&self, email: &str, code: &str) -> Result<()> {
        let Some(url) = &self.webhook_url else {
            info!("No mail relay configured; verification code for {} is {}", email, code);
            return Ok(());
        };

        let request = MailRequest {
            to: email,
            subject: "Your Partybook verification code",
            text: format!(
                "Your verification code is {}. It expires in {} minutes.",
                code,
                self.ttl.num_minutes()
            ),
        };
        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .context("Failed to reach mail relay")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            bail!("Mail relay rejected message ({}): {}", status, error_text);
        }
        Ok(())
    }
}

#[async_trait]
impl VerificationChannelPort for EmailVerificationChannel {
    async fn send_code(&self, email: &str) -> Result<()> {
        let code = Self::generate_code();
        self.deliver(email, &code).await?;

        let pending = PendingCode {
            code,
            expires_at: Utc::now() + self.ttl,
            failed_attempts: 0,
        };
        self.codes.write().await.insert(email.to_string(), pending);
        debug!("Issued verification code for {}", email);
        Ok(())
    }

    async fn verify_code(&self, email: &str, code: &str) -> Result<bool> {
        let mut codes = self.codes.write().await;
        let Some(pending) = codes.get_mut(email) else {
            return Ok(false);
        };

        if pending.expires_at <= Utc::now() {
            codes.remove(email);
            return Ok(false);
        }
        if pending.code != code {
            pending.failed_attempts += 1;
            if pending.failed_attempts >= MAX_CODE_ATTEMPTS {
                codes.remove(email);
                warn!("Too many wrong verification codes for {}; code revoked", email);
            }
            return Ok(false);
        }
        codes.remove(email);
        Ok(true)
    }

    async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut codes = self.codes.write().await;
        let before = codes.len();
        codes.retain(|_, pending| pending.expires_at > now);
        before - codes.len()
    }
}
