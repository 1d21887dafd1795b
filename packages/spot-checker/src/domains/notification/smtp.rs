//! SMTP delivery: direct email, or SMS through a carrier's email gateway.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use std::time::Duration;
use tracing::{debug, info};

use super::{Message, Recipient};
use crate::common::CheckError;
use crate::kernel::BaseNotifier;

const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    /// STARTTLS relay authenticated as `user`, which is also the sender.
    pub fn new(host: &str, port: u16, user: &str, password: &str) -> Result<Self, CheckError> {
        let from: Mailbox = user
            .parse()
            .map_err(|e| CheckError::Config(format!("invalid SMTP_USER address {:?}: {}", user, e)))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| CheckError::Config(format!("invalid SMTP relay {:?}: {}", host, e)))?
            .port(port)
            .credentials(Credentials::new(user.to_string(), password.to_string()))
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        Ok(Self { transport, from })
    }

    /// Build the outgoing email. Gateways drop the subject, so the body is self-contained.
    pub fn compose(&self, message: &Message, recipient: &Recipient) -> Result<lettre::Message, CheckError> {
        let address = recipient.email_address()?;
        let to: Mailbox = address.parse().map_err(|e| {
            CheckError::Delivery(format!("failed to set TO address {:?}: {}", address, e))
        })?;

        lettre::Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(message.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(message.body.clone())
            .map_err(|e| CheckError::Delivery(format!("failed to build email: {}", e)))
    }
}

#[async_trait]
impl BaseNotifier for SmtpNotifier {
    async fn deliver(&self, message: &Message, recipient: &Recipient) -> Result<(), CheckError> {
        let email = self.compose(message, recipient)?;
        debug!(envelope = ?email.envelope(), "Sending email");

        self.transport
            .send(email)
            .await
            .map_err(|e| CheckError::Delivery(format!("failed to send email: {}", e)))?;

        info!("Email notification sent");
        Ok(())
    }
}
