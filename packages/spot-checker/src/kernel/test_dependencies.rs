// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into SpotChecker for tests.
// Every mock records its calls so tests can assert on what the pipeline did.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::{BaseAI, BaseNotifier, BaseWebScraper, NotificationTarget, SpotCheckerDeps};
use crate::common::CheckError;
use crate::domains::availability::LlmClassifier;
use crate::domains::notification::{Message, Recipient};

// =============================================================================
// Mock Web Scraper
// =============================================================================

/// Returns queued pages in order; repeats the last one once the queue is drained
pub struct MockWebScraper {
    pages: Mutex<VecDeque<Result<String, String>>>,
    last: Mutex<Option<String>>,
    calls: Mutex<Vec<String>>,
}

impl MockWebScraper {
    pub fn new() -> Self {
        Self {
            pages: Mutex::new(VecDeque::new()),
            last: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_page(self, text: &str) -> Self {
        self.pages.lock().unwrap().push_back(Ok(text.to_string()));
        self
    }

    /// Queue a fetch failure (network error, non-2xx status)
    pub fn with_failure(self, message: &str) -> Self {
        self.pages.lock().unwrap().push_back(Err(message.to_string()));
        self
    }

    /// Replace what the next fetches return
    pub fn set_page(&self, text: &str) {
        let mut pages = self.pages.lock().unwrap();
        pages.clear();
        pages.push_back(Ok(text.to_string()));
    }

    /// Get all URLs that were fetched
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockWebScraper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseWebScraper for MockWebScraper {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        self.calls.lock().unwrap().push(url.to_string());

        let next = self.pages.lock().unwrap().pop_front();
        match next {
            Some(Ok(text)) => {
                *self.last.lock().unwrap() = Some(text.clone());
                Ok(text)
            }
            Some(Err(message)) => Err(anyhow::anyhow!(message)),
            None => self
                .last
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| anyhow::anyhow!("MockWebScraper has no page for {}", url)),
        }
    }
}

// =============================================================================
// Mock AI
// =============================================================================

/// Returns queued responses in order and records every prompt
pub struct MockAI {
    responses: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl MockAI {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_response(self, response: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(response.to_string()));
        self
    }

    pub fn with_failure(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

impl Default for MockAI {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseAI for MockAI {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(anyhow::anyhow!(message)),
            None => Err(anyhow::anyhow!("MockAI has no response queued")),
        }
    }
}

// =============================================================================
// Mock Notifier
// =============================================================================

pub struct MockNotifier {
    sent: Mutex<Vec<(Message, Recipient)>>,
    fail_with: Option<String>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_with: None,
        }
    }

    /// Every delivery fails with a `Delivery` error (the attempt is still recorded)
    pub fn failing(message: &str) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_with: Some(message.to_string()),
        }
    }

    pub fn sent(&self) -> Vec<(Message, Recipient)> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseNotifier for MockNotifier {
    async fn deliver(&self, message: &Message, recipient: &Recipient) -> Result<(), CheckError> {
        self.sent
            .lock()
            .unwrap()
            .push((message.clone(), recipient.clone()));

        match &self.fail_with {
            Some(reason) => Err(CheckError::Delivery(reason.clone())),
            None => Ok(()),
        }
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Mock wiring for SpotChecker; keeps handles to the mocks for assertions
pub struct TestDependencies {
    pub scraper: Arc<MockWebScraper>,
    pub ai: Arc<MockAI>,
    pub notifier: Arc<MockNotifier>,
    pub recipient: Recipient,
    pub notifications_enabled: bool,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            scraper: Arc::new(MockWebScraper::new()),
            ai: Arc::new(MockAI::new()),
            notifier: Arc::new(MockNotifier::new()),
            recipient: Recipient::Phone {
                phone_number: "5551234567".to_string(),
                carrier: Some("verizon".to_string()),
            },
            notifications_enabled: true,
        }
    }

    pub fn mock_scraper(mut self, scraper: MockWebScraper) -> Self {
        self.scraper = Arc::new(scraper);
        self
    }

    pub fn mock_ai(mut self, ai: MockAI) -> Self {
        self.ai = Arc::new(ai);
        self
    }

    pub fn mock_notifier(mut self, notifier: MockNotifier) -> Self {
        self.notifier = Arc::new(notifier);
        self
    }

    pub fn without_notifications(mut self) -> Self {
        self.notifications_enabled = false;
        self
    }

    /// Deps backed by the model classifier over `MockAI`
    pub fn deps(&self) -> SpotCheckerDeps {
        SpotCheckerDeps {
            scraper: self.scraper.clone(),
            classifier: Arc::new(LlmClassifier::new(self.ai.clone())),
            notification: self.notifications_enabled.then(|| NotificationTarget {
                notifier: self.notifier.clone(),
                recipient: self.recipient.clone(),
            }),
        }
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
