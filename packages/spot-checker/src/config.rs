use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

use crate::domains::notification::Recipient;

pub const DEFAULT_URL: &str = "https://andersonswim.com/";
pub const DEFAULT_START_MARKER: &str = "Welcome to Anderson’s Swim School";
pub const DEFAULT_END_MARKER: &str = "Average email response time";
pub const DEFAULT_SNAPSHOT_PATH: &str = "/tmp/previous_content";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Which availability check to run on a detected change
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierConfig {
    Llm {
        api_key: String,
        model: String,
        base_url: Option<String>,
    },
    Keyword {
        patterns: Vec<String>,
    },
}

/// Which transport delivers notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifierKind {
    Smtp,
    Twilio,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TwilioSettings {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    pub from_number: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipientSettings {
    pub phone_number: Option<String>,
    pub carrier: Option<String>,
    pub email: Option<String>,
}

impl RecipientSettings {
    /// Resolve the configured recipient. Email wins when both are set.
    pub fn recipient(&self) -> Option<Recipient> {
        if let Some(address) = &self.email {
            return Some(Recipient::Email {
                address: address.clone(),
            });
        }
        self.phone_recipient()
    }

    /// The phone recipient, ignoring any configured email
    pub fn phone_recipient(&self) -> Option<Recipient> {
        self.phone_number.as_ref().map(|phone_number| Recipient::Phone {
            phone_number: phone_number.clone(),
            carrier: self.carrier.clone(),
        })
    }
}

/// The part of the configuration the pipeline itself needs
#[derive(Debug, Clone, PartialEq)]
pub struct CheckerSettings {
    pub url: String,
    pub start_marker: String,
    pub end_marker: String,
    pub snapshot_path: PathBuf,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub url: String,
    pub start_marker: String,
    pub end_marker: String,
    pub snapshot_path: PathBuf,
    pub schedule: Option<String>,
    pub classifier: ClassifierConfig,
    pub notifier: NotifierKind,
    pub smtp: SmtpSettings,
    pub twilio: TwilioSettings,
    pub recipient: RecipientSettings,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let classifier = match get("SPOT_CLASSIFIER").as_deref().unwrap_or("llm") {
            "llm" => ClassifierConfig::Llm {
                api_key: get("OPENAI_API_KEY")
                    .context("OPENAI_API_KEY must be set for the llm classifier")?,
                model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                base_url: get("OPENAI_BASE_URL"),
            },
            "keyword" => {
                let patterns = parse_patterns(&get("NO_AVAILABILITY_PATTERNS").unwrap_or_default());
                if patterns.is_empty() {
                    bail!("NO_AVAILABILITY_PATTERNS must list at least one pattern for the keyword classifier");
                }
                ClassifierConfig::Keyword { patterns }
            }
            other => bail!("SPOT_CLASSIFIER must be 'llm' or 'keyword', got '{}'", other),
        };

        let notifier = match get("NOTIFIER").as_deref().unwrap_or("smtp") {
            "smtp" => NotifierKind::Smtp,
            "twilio" => NotifierKind::Twilio,
            other => bail!("NOTIFIER must be 'smtp' or 'twilio', got '{}'", other),
        };

        Ok(Self {
            url: get("SPOT_URL").unwrap_or_else(|| DEFAULT_URL.to_string()),
            start_marker: lookup("SPOT_START_MARKER")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_START_MARKER.to_string()),
            end_marker: lookup("SPOT_END_MARKER")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_END_MARKER.to_string()),
            snapshot_path: get("SPOT_SNAPSHOT_PATH")
                .unwrap_or_else(|| DEFAULT_SNAPSHOT_PATH.to_string())
                .into(),
            schedule: get("SPOT_SCHEDULE"),
            classifier,
            notifier,
            smtp: SmtpSettings {
                host: get("SMTP_HOST").unwrap_or_else(|| "smtp.gmail.com".to_string()),
                port: get("SMTP_PORT")
                    .unwrap_or_else(|| "587".to_string())
                    .parse()
                    .context("SMTP_PORT must be a valid port number")?,
                user: get("SMTP_USER"),
                password: get("SMTP_PASSWORD"),
            },
            twilio: TwilioSettings {
                account_sid: get("TWILIO_ACCOUNT_SID"),
                auth_token: get("TWILIO_AUTH_TOKEN"),
                from_number: get("TWILIO_PHONE_NUMBER"),
            },
            recipient: RecipientSettings {
                phone_number: get("RECIPIENT_PHONE"),
                carrier: get("RECIPIENT_CARRIER"),
                email: get("RECIPIENT_EMAIL"),
            },
        })
    }

    pub fn checker_settings(&self) -> CheckerSettings {
        CheckerSettings {
            url: self.url.clone(),
            start_marker: self.start_marker.clone(),
            end_marker: self.end_marker.clone(),
            snapshot_path: self.snapshot_path.clone(),
        }
    }
}

/// Split a comma-separated pattern list, dropping blanks
pub fn parse_patterns(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_with_only_api_key() {
        let config = config_from(&[("OPENAI_API_KEY", "sk-test")]).unwrap();

        assert_eq!(config.url, DEFAULT_URL);
        assert_eq!(config.start_marker, DEFAULT_START_MARKER);
        assert_eq!(config.end_marker, DEFAULT_END_MARKER);
        assert_eq!(config.snapshot_path, PathBuf::from(DEFAULT_SNAPSHOT_PATH));
        assert_eq!(config.schedule, None);
        assert_eq!(config.notifier, NotifierKind::Smtp);
        assert_eq!(config.smtp.host, "smtp.gmail.com");
        assert_eq!(config.smtp.port, 587);
        assert_eq!(
            config.classifier,
            ClassifierConfig::Llm {
                api_key: "sk-test".to_string(),
                model: DEFAULT_MODEL.to_string(),
                base_url: None,
            }
        );
    }

    #[test]
    fn llm_classifier_requires_api_key() {
        assert!(config_from(&[]).is_err());
        assert!(config_from(&[("OPENAI_API_KEY", "   ")]).is_err());
    }

    #[test]
    fn keyword_classifier_reads_patterns() {
        let config = config_from(&[
            ("SPOT_CLASSIFIER", "keyword"),
            ("NO_AVAILABILITY_PATTERNS", "fully booked, no spots ,,waitlist"),
        ])
        .unwrap();

        assert_eq!(
            config.classifier,
            ClassifierConfig::Keyword {
                patterns: vec![
                    "fully booked".to_string(),
                    "no spots".to_string(),
                    "waitlist".to_string()
                ]
            }
        );
    }

    #[test]
    fn keyword_classifier_without_patterns_is_rejected() {
        assert!(config_from(&[("SPOT_CLASSIFIER", "keyword")]).is_err());
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert!(config_from(&[("OPENAI_API_KEY", "k"), ("SPOT_CLASSIFIER", "magic")]).is_err());
        assert!(config_from(&[("OPENAI_API_KEY", "k"), ("NOTIFIER", "pigeon")]).is_err());
        assert!(config_from(&[("OPENAI_API_KEY", "k"), ("SMTP_PORT", "nope")]).is_err());
    }

    #[test]
    fn email_recipient_wins_over_phone() {
        let config = config_from(&[
            ("OPENAI_API_KEY", "k"),
            ("RECIPIENT_PHONE", "5551234567"),
            ("RECIPIENT_CARRIER", "verizon"),
            ("RECIPIENT_EMAIL", "parent@example.com"),
        ])
        .unwrap();

        assert_eq!(
            config.recipient.recipient(),
            Some(Recipient::Email {
                address: "parent@example.com".to_string()
            })
        );
    }

    #[test]
    fn phone_recipient_keeps_carrier() {
        let config = config_from(&[
            ("OPENAI_API_KEY", "k"),
            ("RECIPIENT_PHONE", "5551234567"),
            ("RECIPIENT_CARRIER", "tmobile"),
        ])
        .unwrap();

        assert_eq!(
            config.recipient.recipient(),
            Some(Recipient::Phone {
                phone_number: "5551234567".to_string(),
                carrier: Some("tmobile".to_string()),
            })
        );
    }

    #[test]
    fn phone_recipient_ignores_email() {
        let config = config_from(&[
            ("OPENAI_API_KEY", "k"),
            ("RECIPIENT_PHONE", "+15551234567"),
            ("RECIPIENT_EMAIL", "parent@example.com"),
        ])
        .unwrap();

        assert_eq!(
            config.recipient.phone_recipient(),
            Some(Recipient::Phone {
                phone_number: "+15551234567".to_string(),
                carrier: None,
            })
        );
    }

    #[test]
    fn no_recipient_configured() {
        let config = config_from(&[("OPENAI_API_KEY", "k")]).unwrap();
        assert_eq!(config.recipient.recipient(), None);
    }

    #[test]
    fn parse_patterns_trims_and_skips_blanks() {
        assert_eq!(parse_patterns(" a ,b,, "), vec!["a", "b"]);
        assert!(parse_patterns("").is_empty());
    }
}
