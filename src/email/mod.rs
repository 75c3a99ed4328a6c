/**
 * Email Collaborator
 *
 * Outbound email for the password-reset flow. The flows depend on the
 * `Mailer` contract, not on SMTP: `send(to, subject, html_body)` either
 * succeeds or fails, and a failure must leave no stored reset token the
 * user cannot retrieve (the forgot-password handler clears the fields on
 * failure).
 *
 * The SMTP implementation is optional; when the transport settings are
 * absent from the environment the capability is absent and reset requests
 * fail with a Server error.
 */

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

use crate::server::config::SmtpConfig;

/// Email delivery failure
#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("smtp transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("{0}")]
    Other(String),
}

/// Outbound email contract
///
/// Implemented by the SMTP transport in production and by a recording
/// mailer in tests.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), MailError>;
}

/// SMTP implementation of the `Mailer` contract
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build an SMTP mailer from configuration
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?.port(config.port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from: config.from.parse()?,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), MailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())?;

        self.transport.send(message).await?;
        tracing::info!("sent email to {}", to);
        Ok(())
    }
}

/// Subject line for reset emails
pub const RESET_EMAIL_SUBJECT: &str = "Password Reset Request - OrganicShop";

/// Build the HTML body for a reset email
///
/// The reset URL embeds the plaintext token; this body is the only place
/// the plaintext ever leaves the process.
pub fn reset_email_body(reset_url: &str) -> String {
    format!(
        r#"<h1>Password Reset Request</h1>
<p>You requested a password reset for your OrganicShop account.</p>
<p>Please click the link below to reset your password:</p>
<a href="{reset_url}">Reset Password</a>
<p>Or copy and paste this link into your browser:</p>
<p>{reset_url}</p>
<p>This link will expire in 10 minutes.</p>
<p>If you didn't request this, please ignore this email.</p>"#
    )
}
