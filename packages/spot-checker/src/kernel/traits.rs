// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (what to prompt for, when to notify) lives in domains/.
//
// Naming convention: Base* for trait names (e.g., BaseAI, BaseNotifier)

use anyhow::Result;
use async_trait::async_trait;

use crate::common::CheckError;
use crate::domains::notification::{Message, Recipient};

// =============================================================================
// Web Scraper Trait (Infrastructure)
// =============================================================================

#[async_trait]
pub trait BaseWebScraper: Send + Sync {
    /// Fetch a page and return its visible text (markup stripped)
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

// =============================================================================
// AI Trait (Infrastructure - Generic LLM capabilities)
// =============================================================================

#[async_trait]
pub trait BaseAI: Send + Sync {
    /// Complete a prompt with an LLM (returns raw text response)
    async fn complete(&self, prompt: &str) -> Result<String>;
}

// =============================================================================
// Notifier Trait (Infrastructure - SMS/email delivery)
// =============================================================================

#[async_trait]
pub trait BaseNotifier: Send + Sync {
    /// Deliver one message to one recipient. No retries.
    async fn deliver(&self, message: &Message, recipient: &Recipient) -> Result<(), CheckError>;
}
