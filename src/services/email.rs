// src/services/email.rs
//! Outbound email via SES, with a log fallback for unconfigured environments

use aws_config::{BehaviorVersion, Region};
use aws_sdk_sesv2::Client as SesClient;
use thiserror::Error;
use tracing::{error, info};

use crate::common::safe_email_log;

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("SES send failed: {0}")]
    SendFailed(String),
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Verified SES sender address; when absent, sends fall back to logging
    pub from_email: Option<String>,
    pub region: String,
}

/// Delivers one-time login codes to end users
#[derive(Debug, Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Send a login code to `email`
    ///
    /// When no sender address is configured the code is logged instead, so
    /// local development works without SES credentials. The fallback path
    /// never fails; a genuine SES delivery failure is surfaced to the caller.
    pub async fn send_code(&self, email: &str, code: &str) -> Result<(), EmailError> {
        let Some(from_email) = self.config.from_email.clone() else {
            info!(
                to = %email,
                code = %code,
                "Email sender not configured - logging OTP code instead of sending"
            );
            return Ok(());
        };

        let client = self.ses_client().await;

        use aws_sdk_sesv2::types::{Body as SesBody, Content, Destination, EmailContent, Message};

        let destination = Destination::builder().to_addresses(email).build();

        let subject_content = Content::builder()
            .data("Your Login Code")
            .charset("UTF-8")
            .build()
            .map_err(|e| EmailError::SendFailed(format!("Failed to build subject: {}", e)))?;

        let body_content = Content::builder()
            .data(login_code_body(code))
            .charset("UTF-8")
            .build()
            .map_err(|e| EmailError::SendFailed(format!("Failed to build body: {}", e)))?;

        let ses_body = SesBody::builder().html(body_content).build();

        let message = Message::builder()
            .subject(subject_content)
            .body(ses_body)
            .build();

        let email_content = EmailContent::builder().simple(message).build();

        let result = client
            .send_email()
            .from_email_address(from_email)
            .destination(destination)
            .content(email_content)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, to = %safe_email_log(email), "Failed to send OTP email via SES");
                EmailError::SendFailed(format!("Send failed: {}", e))
            })?;

        info!(
            to = %safe_email_log(email),
            message_id = ?result.message_id(),
            "OTP email sent via SES"
        );

        Ok(())
    }

    async fn ses_client(&self) -> SesClient {
        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(self.config.region.clone()))
            .load()
            .await;

        SesClient::new(&aws_config)
    }
}

fn login_code_body(code: &str) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #333;">Your Login Code</h2>
  <p>Your verification code is:</p>
  <div style="background-color: #f4f4f4; padding: 20px; text-align: center; margin: 20px 0; border-radius: 5px;">
    <h1 style="color: #007bff; margin: 0; font-size: 32px; letter-spacing: 5px;">{}</h1>
  </div>
  <p style="color: #666; font-size: 14px;">This code will expire in 1 minute.</p>
  <p style="color: #666; font-size: 14px;">If you didn't request this code, please ignore this email.</p>
</div>"#,
        code
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_sender_falls_back_to_logging() {
        let service = EmailService::new(EmailConfig {
            from_email: None,
            region: "us-east-1".to_string(),
        });

        // Must not error and must not attempt any network call
        service
            .send_code("a@b.com", "ABC123")
            .await
            .expect("fallback path should never fail");
    }

    #[test]
    fn test_login_code_body_embeds_code() {
        let body = login_code_body("XY12Z9");
        assert!(body.contains("XY12Z9"));
        assert!(body.contains("expire in 1 minute"));
    }
}
