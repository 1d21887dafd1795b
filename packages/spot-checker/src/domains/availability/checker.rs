//! One pipeline run: fetch → extract → compare → classify → notify.
//!
//! ```text
//! Fetching ─► Extracting ─┬─► NoBaseline ─► store ─► Bootstrapped
//!                         └─► Comparing ─┬─► Unchanged
//!                                        └─► Classifying ─┬─► NotAvailable ─► store
//!                                                         └─► Available ─► notify? ─► store
//! ```
//!
//! Any error before the final store leaves the snapshot untouched, so the
//! next run compares against the last known-good content.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::{BaseClassifier, ContentExtractor, SnapshotStore};
use crate::common::CheckError;
use crate::config::CheckerSettings;
use crate::domains::notification::Message;
use crate::kernel::{BaseWebScraper, NotificationTarget, SpotCheckerDeps};

/// How a successful run ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    /// No snapshot existed; the fresh content became the baseline
    Bootstrapped,
    Unchanged,
    NotAvailable { explanation: String },
    /// `notified` is false when notifications are off or delivery failed
    Available { explanation: String, notified: bool },
}

pub struct SpotChecker {
    url: String,
    extractor: ContentExtractor,
    snapshots: SnapshotStore,
    scraper: Arc<dyn BaseWebScraper>,
    classifier: Arc<dyn BaseClassifier>,
    notification: Option<NotificationTarget>,
}

impl SpotChecker {
    pub fn new(settings: CheckerSettings, deps: SpotCheckerDeps) -> Self {
        Self {
            url: settings.url,
            extractor: ContentExtractor::new(settings.start_marker, settings.end_marker),
            snapshots: SnapshotStore::new(settings.snapshot_path),
            scraper: deps.scraper,
            classifier: deps.classifier,
            notification: deps.notification,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn snapshots(&self) -> &SnapshotStore {
        &self.snapshots
    }

    /// Run the pipeline once.
    pub async fn run_once(&self) -> Result<RunOutcome, CheckError> {
        let started = Instant::now();

        let page = self
            .scraper
            .fetch_text(&self.url)
            .await
            .map_err(CheckError::Fetch)?;
        let new_content = self.extractor.extract(&page)?;

        let Some(old_content) = self.snapshots.load().await? else {
            info!("No previous content found, saving current content");
            self.snapshots.store(&new_content).await?;
            return Ok(RunOutcome::Bootstrapped);
        };

        debug!(old_content = %old_content, new_content = %new_content, "Comparing content");

        if old_content == new_content {
            info!(elapsed_ms = started.elapsed().as_millis(), "No change in content");
            return Ok(RunOutcome::Unchanged);
        }

        let verdict = self.classifier.classify(&old_content, &new_content).await?;
        info!(
            available = verdict.available,
            explanation = %verdict.explanation,
            elapsed_ms = started.elapsed().as_millis(),
            "Availability check result"
        );

        let outcome = if verdict.available {
            let notified = self.notify(&verdict.explanation).await;
            RunOutcome::Available {
                explanation: verdict.explanation,
                notified,
            }
        } else {
            RunOutcome::NotAvailable {
                explanation: verdict.explanation,
            }
        };

        self.snapshots.store(&new_content).await?;
        Ok(outcome)
    }

    /// Deliver the spot-found message. Failures are logged, never propagated.
    async fn notify(&self, explanation: &str) -> bool {
        let Some(target) = &self.notification else {
            info!(explanation = %explanation, "Notifications disabled, not sending");
            return false;
        };

        info!(explanation = %explanation, "Sending notification, we found availability");
        let message = Message::spot_found(explanation, &self.url);

        match target.notifier.deliver(&message, &target.recipient).await {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "Notification delivery failed");
                false
            }
        }
    }
}

/// Run once and log the result the same way for one-shot and scheduled mode
pub async fn run_and_log(checker: &SpotChecker) -> Result<RunOutcome, CheckError> {
    let started = Instant::now();
    info!(url = %checker.url(), "Checking for spots...");

    match checker.run_once().await {
        Ok(outcome) => {
            let elapsed_ms = started.elapsed().as_millis();
            match &outcome {
                RunOutcome::Available { notified, .. } => {
                    info!(elapsed_ms, notified = *notified, "Spot found")
                }
                RunOutcome::Bootstrapped => info!(elapsed_ms, "Baseline stored"),
                RunOutcome::Unchanged | RunOutcome::NotAvailable { .. } => {
                    info!(elapsed_ms, "No spot found")
                }
            }
            Ok(outcome)
        }
        Err(e) => {
            warn!(error = %e, "Spot check failed");
            Err(e)
        }
    }
}
