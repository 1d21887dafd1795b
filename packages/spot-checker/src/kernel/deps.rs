// Wiring: turn a Config into the trait objects the pipeline runs on.

use anyhow::{Context, Result};
use std::sync::Arc;
use twilio::{TwilioOptions, TwilioService};

use super::{ai::OpenAIModel, simple_scraper::SimpleScraper, BaseNotifier, BaseWebScraper};
use crate::config::{ClassifierConfig, Config, NotifierKind};
use crate::domains::availability::{BaseClassifier, KeywordClassifier, LlmClassifier};
use crate::domains::notification::{Recipient, SmtpNotifier, TwilioNotifier};

/// A notifier paired with the one recipient it serves
#[derive(Clone)]
pub struct NotificationTarget {
    pub notifier: Arc<dyn BaseNotifier>,
    pub recipient: Recipient,
}

/// Pipeline dependencies (using traits for testability)
#[derive(Clone)]
pub struct SpotCheckerDeps {
    pub scraper: Arc<dyn BaseWebScraper>,
    pub classifier: Arc<dyn BaseClassifier>,
    /// None when notifications are skipped
    pub notification: Option<NotificationTarget>,
}

impl SpotCheckerDeps {
    /// Build production dependencies.
    ///
    /// Notifier settings are only validated when notifications are enabled.
    pub fn from_config(config: &Config, skip_notifications: bool) -> Result<Self> {
        let scraper: Arc<dyn BaseWebScraper> = Arc::new(SimpleScraper::new()?);
        let classifier = build_classifier(&config.classifier);

        let notification = if skip_notifications {
            tracing::info!("Notifications skipped, results will only be logged");
            None
        } else {
            Some(build_notification(config)?)
        };

        Ok(Self {
            scraper,
            classifier,
            notification,
        })
    }
}

fn build_classifier(config: &ClassifierConfig) -> Arc<dyn BaseClassifier> {
    match config {
        ClassifierConfig::Llm {
            api_key,
            model,
            base_url,
        } => {
            tracing::info!(model = %model, "Initialize model...");
            let mut ai = OpenAIModel::new(api_key.clone(), model.clone());
            if let Some(url) = base_url {
                ai = ai.with_base_url(url.clone());
            }
            Arc::new(LlmClassifier::new(Arc::new(ai)))
        }
        ClassifierConfig::Keyword { patterns } => {
            tracing::info!(patterns = patterns.len(), "Using keyword classifier");
            Arc::new(KeywordClassifier::new(patterns.iter().cloned()))
        }
    }
}

fn build_notification(config: &Config) -> Result<NotificationTarget> {
    match config.notifier {
        NotifierKind::Smtp => {
            let recipient = config
                .recipient
                .recipient()
                .context("RECIPIENT_EMAIL or RECIPIENT_PHONE must be set to send notifications")?;

            // Fail at startup rather than on the first spot found
            recipient
                .email_address()
                .context("Recipient cannot be reached by email")?;

            let user = config
                .smtp
                .user
                .as_deref()
                .context("SMTP_USER must be set for the smtp notifier")?;
            let password = config
                .smtp
                .password
                .as_deref()
                .context("SMTP_PASSWORD must be set for the smtp notifier")?;

            let notifier = SmtpNotifier::new(&config.smtp.host, config.smtp.port, user, password)?;
            Ok(NotificationTarget {
                notifier: Arc::new(notifier),
                recipient,
            })
        }
        NotifierKind::Twilio => {
            // Twilio texts the phone even when an email is also configured
            let recipient = config
                .recipient
                .phone_recipient()
                .context("RECIPIENT_PHONE must be set for the twilio notifier")?;

            let twilio = &config.twilio;
            let options = TwilioOptions {
                account_sid: twilio
                    .account_sid
                    .clone()
                    .context("TWILIO_ACCOUNT_SID must be set")?,
                auth_token: twilio
                    .auth_token
                    .clone()
                    .context("TWILIO_AUTH_TOKEN must be set")?,
                from_number: twilio
                    .from_number
                    .clone()
                    .context("TWILIO_PHONE_NUMBER must be set")?,
            };

            let service = Arc::new(TwilioService::new(options));
            Ok(NotificationTarget {
                notifier: Arc::new(TwilioNotifier::new(service)),
                recipient,
            })
        }
    }
}
