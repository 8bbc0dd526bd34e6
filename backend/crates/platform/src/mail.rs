//! Transactional Email
//!
//! Messages go out through the Mailtrap send API. Without credentials the
//! [`Mailer`] degrades to a disabled transport that only logs.

use serde::Serialize;
use thiserror::Error;

pub const MAILTRAP_API_URL: &str = "https://send.api.mailtrap.io/api/send";

/// A rendered message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Mail request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Mail provider responded with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Mailtrap credentials and sender identity
#[derive(Debug, Clone)]
pub struct MailerConfig {
    pub api_url: String,
    pub api_token: Option<String>,
    pub from_email: Option<String>,
    pub from_name: Option<String>,
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            api_url: MAILTRAP_API_URL.to_string(),
            api_token: None,
            from_email: None,
            from_name: None,
        }
    }
}

/// Outbound email transport
#[trait_variant::make(EmailSender: Send)]
pub trait LocalEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError>;
}

#[derive(Serialize)]
struct Address<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    from: Address<'a>,
    to: Vec<Address<'a>>,
    subject: &'a str,
    html: &'a str,
}

/// Mailtrap HTTP API sender
#[derive(Debug, Clone)]
pub struct MailtrapSender {
    client: reqwest::Client,
    api_url: String,
    api_token: String,
    from_email: String,
    from_name: Option<String>,
}

impl MailtrapSender {
    pub fn new(
        api_url: impl Into<String>,
        api_token: impl Into<String>,
        from_email: impl Into<String>,
        from_name: Option<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
            api_token: api_token.into(),
            from_email: from_email.into(),
            from_name: from_name.filter(|n| !n.is_empty()),
        }
    }
}

impl EmailSender for MailtrapSender {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        let body = SendRequest {
            from: Address {
                email: &self.from_email,
                name: self.from_name.as_deref(),
            },
            to: vec![Address {
                email: &message.to,
                name: None,
            }],
            subject: &message.subject,
            html: &message.html,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

/// Configured transport
#[derive(Debug, Clone)]
pub enum Mailer {
    Mailtrap(MailtrapSender),
    Disabled,
}

impl Mailer {
    /// Mailtrap when token and sender address are set, otherwise disabled
    pub fn from_config(config: &MailerConfig) -> Self {
        match (&config.api_token, &config.from_email) {
            (Some(token), Some(from)) if !token.is_empty() && !from.is_empty() => {
                Mailer::Mailtrap(MailtrapSender::new(
                    config.api_url.clone(),
                    token.clone(),
                    from.clone(),
                    config.from_name.clone(),
                ))
            }
            _ => {
                tracing::warn!("Mailtrap email configuration is missing; email will not be sent");
                Mailer::Disabled
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Mailer::Mailtrap(_))
    }

    /// Send in the background; failures are logged, never returned
    pub fn dispatch(&self, message: EmailMessage) {
        let mailer = self.clone();
        tokio::spawn(async move {
            if let Err(e) = EmailSender::send(&mailer, &message).await {
                tracing::error!(error = %e, to = %message.to, subject = %message.subject, "Failed to send email");
            }
        });
    }
}

impl EmailSender for Mailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        match self {
            Mailer::Mailtrap(sender) => EmailSender::send(sender, message).await,
            Mailer::Disabled => {
                tracing::debug!(to = %message.to, subject = %message.subject, "Email delivery disabled");
                Ok(())
            }
        }
    }
}
