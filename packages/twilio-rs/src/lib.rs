// Minimal client for Twilio Programmable Messaging.
// https://www.twilio.com/docs/messaging/api/message-resource#create-a-message-resource

use std::collections::HashMap;
use std::time::Duration;

pub mod models;
use reqwest::{header, Client};
use thiserror::Error;

use crate::models::{ApiErrorResponse, MessageResponse};

const DEFAULT_BASE_URL: &str = "https://api.twilio.com";

#[derive(Debug, Error)]
pub enum TwilioError {
    #[error("request to Twilio failed: {0}")]
    Request(String),

    #[error("Twilio returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("unable to parse Twilio response: {0}")]
    Parse(String),
}

#[derive(Debug, Clone)]
pub struct TwilioOptions {
    pub account_sid: String,
    pub auth_token: String,
    /// Sender phone number in E.164 format
    pub from_number: String,
}

#[derive(Debug, Clone)]
pub struct TwilioService {
    options: TwilioOptions,
    base_url: String,
    client: Client,
}

impl TwilioService {
    pub fn new(options: TwilioOptions) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            options,
            base_url: DEFAULT_BASE_URL.to_string(),
            client,
        }
    }

    /// Point the client at another host (test doubles, regional edges).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.options.account_sid
        )
    }

    fn message_form<'a>(&'a self, recipient: &'a str, body: &'a str) -> HashMap<&'static str, &'a str> {
        let mut form_body = HashMap::new();
        form_body.insert("To", recipient);
        form_body.insert("From", self.options.from_number.as_str());
        form_body.insert("Body", body);
        form_body
    }

    /// Send an SMS to `recipient` (E.164 phone number).
    pub async fn send_sms(&self, recipient: &str, body: &str) -> Result<MessageResponse, TwilioError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/x-www-form-urlencoded"),
        );

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.options.account_sid, Some(&self.options.auth_token))
            .headers(headers)
            .form(&self.message_form(recipient, body))
            .send()
            .await
            .map_err(|e| TwilioError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorResponse>(&error_body)
                .map(|e| e.message)
                .unwrap_or(error_body);
            return Err(TwilioError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<MessageResponse>()
            .await
            .map_err(|e| TwilioError::Parse(e.to_string()))
    }
}
