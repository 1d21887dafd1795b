//! Notification domain - who gets told, and over which transport.

pub mod carriers;
pub mod models;
pub mod smtp;
pub mod twilio_sms;

pub use carriers::{gateway_domain, sms_gateway_address, CARRIER_DOMAINS};
pub use models::{Message, Recipient};
pub use smtp::SmtpNotifier;
pub use twilio_sms::TwilioNotifier;
