//! Direct SMS through the Twilio Messages API.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
use twilio::TwilioService;

use super::{Message, Recipient};
use crate::common::CheckError;
use crate::kernel::BaseNotifier;

/// Wrapper around TwilioService that implements BaseNotifier
pub struct TwilioNotifier(pub Arc<TwilioService>);

impl TwilioNotifier {
    pub fn new(service: Arc<TwilioService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BaseNotifier for TwilioNotifier {
    async fn deliver(&self, message: &Message, recipient: &Recipient) -> Result<(), CheckError> {
        let phone_number = recipient.phone_number().ok_or_else(|| {
            CheckError::Delivery("Twilio can only reach phone recipients".to_string())
        })?;

        // SMS has no subject line
        let sent = self
            .0
            .send_sms(phone_number, &message.body)
            .await
            .map_err(|e| CheckError::Delivery(format!("failed to send SMS: {}", e)))?;

        info!(sid = %sent.sid, status = %sent.status, "SMS notification sent");
        Ok(())
    }
}
