use serde::{Deserialize, Serialize};

use super::carriers::sms_gateway_address;
use crate::common::CheckError;

/// Where a notification goes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Recipient {
    /// A phone, reached over Twilio or through its carrier's email gateway
    Phone {
        phone_number: String,
        carrier: Option<String>,
    },
    Email {
        address: String,
    },
}

impl Recipient {
    /// Email address that reaches this recipient.
    ///
    /// Phones resolve through their carrier's SMS gateway, so a phone
    /// without a known carrier cannot be reached by email.
    pub fn email_address(&self) -> Result<String, CheckError> {
        match self {
            Recipient::Email { address } => Ok(address.clone()),
            Recipient::Phone {
                phone_number,
                carrier: Some(carrier),
            } => sms_gateway_address(phone_number, carrier),
            Recipient::Phone { carrier: None, .. } => Err(CheckError::Delivery(
                "phone recipient has no carrier, set RECIPIENT_CARRIER to use an SMS gateway"
                    .to_string(),
            )),
        }
    }

    /// Phone number for direct SMS
    pub fn phone_number(&self) -> Option<&str> {
        match self {
            Recipient::Phone { phone_number, .. } => Some(phone_number),
            Recipient::Email { .. } => None,
        }
    }
}

/// Outbound notification payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub subject: String,
    pub body: String,
}

impl Message {
    /// The message sent when a spot opens up
    pub fn spot_found(explanation: &str, url: &str) -> Self {
        Self {
            subject: "Swim spot available".to_string(),
            body: format!("{}\n{}", explanation.trim(), url),
        }
    }
}
