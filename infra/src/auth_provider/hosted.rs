//! Hosted Auth Provider Implementation
//!
//! REST client for a hosted auth API that delivers one-time codes by email
//! and SMS and checks them on submission.
//!
//! ## Features
//!
//! - `POST /auth/v1/otp` to deliver a code, `POST /auth/v1/verify` to check it
//! - Automatic retry with exponential backoff on 429, 5xx and transport errors
//! - Rejected codes (400, 401, 403, 404, 422 on verify) reported as `Ok(false)`
//! - Security: contact values are masked in logs and codes are never logged

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use mr_core::domain::value_objects::ChannelKind;
use mr_core::services::AuthProviderTrait;
use mr_shared::config::AuthProviderConfig;

use crate::InfrastructureError;

/// Path of the code delivery endpoint
pub const OTP_PATH: &str = "auth/v1/otp";

/// Path of the code check endpoint
pub const VERIFY_PATH: &str = "auth/v1/verify";

/// How the provider answered a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResponseClass {
    /// 2xx
    Success,
    /// The provider refused the submitted data
    Rejected,
    /// Worth another attempt after a delay
    Retryable,
    /// Any other status
    Failed,
}

pub(crate) fn classify(status: StatusCode) -> ResponseClass {
    match status.as_u16() {
        200..=299 => ResponseClass::Success,
        400 | 401 | 403 | 404 | 422 => ResponseClass::Rejected,
        429 | 500..=599 => ResponseClass::Retryable,
        _ => ResponseClass::Failed,
    }
}

/// Request body asking the provider to deliver a code
pub(crate) fn otp_request_body(channel: ChannelKind, contact: &str) -> Value {
    match channel {
        ChannelKind::Email => json!({ "email": contact, "create_user": true }),
        ChannelKind::Phone => json!({ "phone": contact, "create_user": true }),
    }
}

/// Request body submitting a code for checking
pub(crate) fn verify_request_body(channel: ChannelKind, contact: &str, code: &str) -> Value {
    match channel {
        ChannelKind::Email => json!({ "type": "email", "email": contact, "token": code }),
        ChannelKind::Phone => json!({ "type": "sms", "phone": contact, "token": code }),
    }
}

#[derive(Debug, Default, Deserialize)]
struct OtpResponse {
    #[serde(default)]
    message_id: Option<String>,
}

/// Message id from a delivery response, or a locally generated request id
pub(crate) fn message_id_from(body: &str) -> String {
    serde_json::from_str::<OtpResponse>(body)
        .ok()
        .and_then(|response| response.message_id)
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| format!("otp_{}", Uuid::new_v4()))
}

/// Hosted auth provider client
pub struct HostedAuthProvider {
    client: reqwest::Client,
    config: AuthProviderConfig,
}

impl HostedAuthProvider {
    /// Create a new hosted auth provider client
    pub fn new(config: AuthProviderConfig) -> Result<Self, InfrastructureError> {
        if config.base_url.trim().is_empty() {
            return Err(InfrastructureError::Config(
                "AUTH_PROVIDER_URL must not be empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        info!(
            base_url = %config.base_url,
            max_retries = config.max_retries,
            "Hosted auth provider initialized"
        );

        Ok(Self { client, config })
    }

    /// POST a JSON body, retrying rate limits, server errors and transport
    /// failures. Returns the first terminal status with its body.
    async fn post_with_retry(
        &self,
        path: &str,
        body: &Value,
        masked_contact: &str,
    ) -> Result<(StatusCode, String), InfrastructureError> {
        let url = self.config.endpoint(path);
        let max_attempts = self.config.max_retries.max(1);
        let mut attempts = 0;
        let mut delay = Duration::from_millis(self.config.retry_delay_ms);

        loop {
            attempts += 1;

            debug!(
                path = path,
                contact = %masked_contact,
                attempt = attempts,
                max_attempts = max_attempts,
                "Calling auth provider"
            );

            let mut request = self
                .client
                .post(&url)
                .header("apikey", &self.config.api_key)
                .json(body);
            if !self.config.api_key.is_empty() {
                request = request.bearer_auth(&self.config.api_key);
            }

            let retry_reason = match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if classify(status) != ResponseClass::Retryable {
                        let text = response.text().await.unwrap_or_default();
                        return Ok((status, text));
                    }
                    format!("HTTP {}", status)
                }
                Err(e) => e.to_string(),
            };

            if attempts >= max_attempts {
                error!(
                    path = path,
                    contact = %masked_contact,
                    attempts = attempts,
                    reason = %retry_reason,
                    "Auth provider request failed"
                );
                return Err(InfrastructureError::Provider(format!(
                    "{} failed after {} attempts: {}",
                    path, attempts, retry_reason
                )));
            }

            warn!(
                path = path,
                contact = %masked_contact,
                attempt = attempts,
                reason = %retry_reason,
                delay_ms = delay.as_millis() as u64,
                "Auth provider request failed, retrying"
            );

            // Wait before retrying with exponential backoff
            tokio::time::sleep(delay).await;
            delay = delay * 2;
        }
    }
}

#[async_trait]
impl AuthProviderTrait for HostedAuthProvider {
    async fn send_code(&self, channel: ChannelKind, contact: &str) -> Result<String, String> {
        let masked = channel.mask(contact);
        let body = otp_request_body(channel, contact);

        let (status, text) = self
            .post_with_retry(OTP_PATH, &body, &masked)
            .await
            .map_err(|e| e.to_string())?;

        match classify(status) {
            ResponseClass::Success => {
                let message_id = message_id_from(&text);
                info!(
                    provider = "hosted",
                    channel = %channel,
                    contact = %masked,
                    message_id = %message_id,
                    "Verification code requested"
                );
                Ok(message_id)
            }
            _ => {
                error!(
                    provider = "hosted",
                    channel = %channel,
                    contact = %masked,
                    status = status.as_u16(),
                    "Auth provider refused to deliver code"
                );
                Err(format!("Code delivery refused with HTTP {}", status.as_u16()))
            }
        }
    }

    async fn verify_code(
        &self,
        channel: ChannelKind,
        contact: &str,
        code: &str,
    ) -> Result<bool, String> {
        let masked = channel.mask(contact);
        let body = verify_request_body(channel, contact, code);

        let (status, _) = self
            .post_with_retry(VERIFY_PATH, &body, &masked)
            .await
            .map_err(|e| e.to_string())?;

        match classify(status) {
            ResponseClass::Success => Ok(true),
            ResponseClass::Rejected => {
                debug!(
                    provider = "hosted",
                    channel = %channel,
                    contact = %masked,
                    status = status.as_u16(),
                    "Auth provider rejected code"
                );
                Ok(false)
            }
            _ => Err(format!("Code check failed with HTTP {}", status.as_u16())),
        }
    }

    fn provider_name(&self) -> &'static str {
        "hosted"
    }
}
