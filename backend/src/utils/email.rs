use anyhow::Result;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::env;

/// Outbound email capability consumed by the auth flows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailDispatcher: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()>;
}

pub struct SmtpMailer {
    mailer: SmtpTransport,
    from_address: String,
    skip_send: bool,
}

impl SmtpMailer {
    pub fn new() -> Result<Self> {
        let smtp_host = env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string());
        let smtp_port = env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse::<u16>()
            .unwrap_or(587);
        let smtp_username = env::var("SMTP_USERNAME").unwrap_or_default();
        let smtp_password = env::var("SMTP_PASSWORD").unwrap_or_default();
        let from_address = env::var("SMTP_FROM_ADDRESS")
            .unwrap_or_else(|_| "noreply@taskbook.local".to_string());
        let skip_send = env::var("SMTP_SKIP_SEND").unwrap_or_default() == "true";

        let mailer = if smtp_username.is_empty() {
            SmtpTransport::builder_dangerous(&smtp_host)
                .port(smtp_port)
                .build()
        } else {
            let creds = Credentials::new(smtp_username, smtp_password);
            SmtpTransport::relay(&smtp_host)?
                .port(smtp_port)
                .credentials(creds)
                .build()
        };

        Ok(Self {
            mailer,
            from_address,
            skip_send,
        })
    }
}

#[async_trait]
impl EmailDispatcher for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        if self.skip_send {
            tracing::debug!(to, subject, "SMTP_SKIP_SEND set, dropping email");
            return Ok(());
        }

        let email = Message::builder()
            .from(self.from_address.parse()?)
            .to(to.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;

        self.mailer.send(&email)?;
        Ok(())
    }
}

/// Plain-text body for a verification-code email.
pub fn verification_code_body(code: &str, ttl_minutes: u64) -> String {
    format!(
        "Your verification code is:\n\n{}\n\nThe code expires in {} minutes. \
         If you did not request it, you can ignore this email.\n\n---\nTaskbook\n",
        code, ttl_minutes
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_contains_code_and_ttl() {
        let body = verification_code_body("482913", 5);
        assert!(body.contains("482913"));
        assert!(body.contains("5 minutes"));
    }
}
