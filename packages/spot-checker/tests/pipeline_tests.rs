//! End-to-end runs of the spot-check pipeline over mock services.

mod common;

use common::{page, TestHarness};
use spot_checker::domains::availability::RunOutcome;
use spot_checker::domains::notification::Recipient;
use spot_checker::kernel::test_dependencies::{MockAI, MockNotifier, MockWebScraper};
use spot_checker::kernel::TestDependencies;
use spot_checker::CheckError;

const BASELINE: &str = "No Single Lessons available this week.";
const OPENED: &str = "Single Lessons available Tuesday 3pm!";

#[tokio::test]
async fn first_run_stores_baseline_without_classifying() {
    let harness = TestHarness::new(
        TestDependencies::new().mock_scraper(MockWebScraper::new().with_page(&page(BASELINE))),
    );

    let outcome = harness.checker.run_once().await.unwrap();

    assert_eq!(outcome, RunOutcome::Bootstrapped);
    assert_eq!(harness.snapshot().await.as_deref(), Some(BASELINE));
    assert_eq!(harness.deps.ai.call_count(), 0);
    assert!(harness.deps.notifier.sent().is_empty());
    assert_eq!(
        harness.deps.scraper.calls(),
        vec!["https://andersonswim.com/".to_string()]
    );
}

#[tokio::test]
async fn unchanged_page_makes_no_model_call() {
    let harness = TestHarness::new(
        TestDependencies::new().mock_scraper(MockWebScraper::new().with_page(&page(BASELINE))),
    );

    assert_eq!(harness.checker.run_once().await.unwrap(), RunOutcome::Bootstrapped);
    assert_eq!(harness.checker.run_once().await.unwrap(), RunOutcome::Unchanged);
    assert_eq!(harness.checker.run_once().await.unwrap(), RunOutcome::Unchanged);

    assert_eq!(harness.deps.ai.call_count(), 0);
    assert!(harness.deps.notifier.sent().is_empty());
    assert_eq!(harness.snapshot().await.as_deref(), Some(BASELINE));
}

#[tokio::test]
async fn whitespace_around_region_does_not_count_as_change() {
    let harness = TestHarness::new(TestDependencies::new().mock_scraper(
        MockWebScraper::new().with_page(&page(&format!("\n\n{}\t", BASELINE))),
    ));
    harness.seed_snapshot(BASELINE).await;

    assert_eq!(harness.checker.run_once().await.unwrap(), RunOutcome::Unchanged);
    assert_eq!(harness.deps.ai.call_count(), 0);
}

#[tokio::test]
async fn available_spot_notifies_and_updates_baseline() {
    let harness = TestHarness::new(
        TestDependencies::new()
            .mock_scraper(MockWebScraper::new().with_page(&page(OPENED)))
            .mock_ai(MockAI::new().with_response(
                r#"{"available": true, "explanation": "A Tuesday slot opened."}"#,
            )),
    );
    harness.seed_snapshot(BASELINE).await;

    let outcome = harness.checker.run_once().await.unwrap();

    assert_eq!(
        outcome,
        RunOutcome::Available {
            explanation: "A Tuesday slot opened.".to_string(),
            notified: true,
        }
    );

    let sent = harness.deps.notifier.sent();
    assert_eq!(sent.len(), 1);
    let (message, recipient) = &sent[0];
    assert!(message.body.contains("A Tuesday slot opened."));
    assert!(message.body.contains("https://andersonswim.com/"));
    assert_eq!(
        recipient,
        &Recipient::Phone {
            phone_number: "5551234567".to_string(),
            carrier: Some("verizon".to_string()),
        }
    );

    assert_eq!(harness.snapshot().await.as_deref(), Some(OPENED));

    let prompts = harness.deps.ai.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains(BASELINE));
    assert!(prompts[0].contains(OPENED));
}

#[tokio::test]
async fn fenced_model_answer_is_accepted() {
    let harness = TestHarness::new(
        TestDependencies::new()
            .mock_scraper(MockWebScraper::new().with_page(&page(OPENED)))
            .mock_ai(MockAI::new().with_response(
                "```json\n{\n  \"available\": true,\n  \"explanation\": \"A Tuesday slot opened.\"\n}\n```",
            )),
    );
    harness.seed_snapshot(BASELINE).await;

    assert!(matches!(
        harness.checker.run_once().await.unwrap(),
        RunOutcome::Available { notified: true, .. }
    ));
}

#[tokio::test]
async fn no_availability_updates_baseline_without_notifying() {
    let harness = TestHarness::new(
        TestDependencies::new()
            .mock_scraper(MockWebScraper::new().with_page(&page("Pool closed Monday for cleaning.")))
            .mock_ai(MockAI::new().with_response(
                r#"{"available": false, "explanation": "Only a closure notice was added."}"#,
            )),
    );
    harness.seed_snapshot(BASELINE).await;

    let outcome = harness.checker.run_once().await.unwrap();

    assert_eq!(
        outcome,
        RunOutcome::NotAvailable {
            explanation: "Only a closure notice was added.".to_string(),
        }
    );
    assert!(harness.deps.notifier.sent().is_empty());
    assert_eq!(
        harness.snapshot().await.as_deref(),
        Some("Pool closed Monday for cleaning.")
    );
}

#[tokio::test]
async fn skipped_notifications_still_update_baseline() {
    let harness = TestHarness::new(
        TestDependencies::new()
            .without_notifications()
            .mock_scraper(MockWebScraper::new().with_page(&page(OPENED)))
            .mock_ai(MockAI::new().with_response(
                r#"{"available": true, "explanation": "A Tuesday slot opened."}"#,
            )),
    );
    harness.seed_snapshot(BASELINE).await;

    let outcome = harness.checker.run_once().await.unwrap();

    assert_eq!(
        outcome,
        RunOutcome::Available {
            explanation: "A Tuesday slot opened.".to_string(),
            notified: false,
        }
    );
    assert!(harness.deps.notifier.sent().is_empty());
    assert_eq!(harness.snapshot().await.as_deref(), Some(OPENED));
}

#[tokio::test]
async fn failed_delivery_still_updates_baseline() {
    let harness = TestHarness::new(
        TestDependencies::new()
            .mock_scraper(MockWebScraper::new().with_page(&page(OPENED)))
            .mock_ai(MockAI::new().with_response(
                r#"{"available": true, "explanation": "A Tuesday slot opened."}"#,
            ))
            .mock_notifier(MockNotifier::failing("smtp auth rejected")),
    );
    harness.seed_snapshot(BASELINE).await;

    let outcome = harness.checker.run_once().await.unwrap();

    assert!(matches!(outcome, RunOutcome::Available { notified: false, .. }));
    assert_eq!(harness.deps.notifier.sent().len(), 1);
    assert_eq!(harness.snapshot().await.as_deref(), Some(OPENED));
}

#[tokio::test]
async fn fetch_failure_keeps_snapshot() {
    let harness = TestHarness::new(
        TestDependencies::new()
            .mock_scraper(MockWebScraper::new().with_failure("HTTP 503 for https://andersonswim.com/")),
    );
    harness.seed_snapshot(BASELINE).await;

    let err = harness.checker.run_once().await.unwrap_err();

    assert!(matches!(err, CheckError::Fetch(_)));
    assert_eq!(harness.snapshot().await.as_deref(), Some(BASELINE));
    assert_eq!(harness.deps.ai.call_count(), 0);
}

#[tokio::test]
async fn missing_marker_keeps_snapshot() {
    let harness = TestHarness::new(
        TestDependencies::new()
            .mock_scraper(MockWebScraper::new().with_page("The site was redesigned. Book online!")),
    );
    harness.seed_snapshot(BASELINE).await;

    let err = harness.checker.run_once().await.unwrap_err();

    assert!(matches!(err, CheckError::MarkerNotFound { .. }));
    assert_eq!(harness.snapshot().await.as_deref(), Some(BASELINE));
}

#[tokio::test]
async fn missing_marker_on_first_run_writes_nothing() {
    let harness = TestHarness::new(
        TestDependencies::new().mock_scraper(MockWebScraper::new().with_page("no markers at all")),
    );

    assert!(harness.checker.run_once().await.is_err());
    assert_eq!(harness.snapshot().await, None);
}

#[tokio::test]
async fn model_failure_keeps_snapshot_for_next_run() {
    let harness = TestHarness::new(
        TestDependencies::new()
            .mock_scraper(MockWebScraper::new().with_page(&page(OPENED)))
            .mock_ai(
                MockAI::new()
                    .with_failure("rate limited")
                    .with_response(r#"{"available": true, "explanation": "A Tuesday slot opened."}"#),
            ),
    );
    harness.seed_snapshot(BASELINE).await;

    let err = harness.checker.run_once().await.unwrap_err();
    assert!(matches!(err, CheckError::ModelCall(_)));
    assert_eq!(harness.snapshot().await.as_deref(), Some(BASELINE));
    assert!(harness.deps.notifier.sent().is_empty());

    // Next tick re-attempts the same diff
    let outcome = harness.checker.run_once().await.unwrap();
    assert!(matches!(outcome, RunOutcome::Available { notified: true, .. }));
    assert_eq!(harness.deps.ai.call_count(), 2);
    assert_eq!(harness.snapshot().await.as_deref(), Some(OPENED));
}

#[tokio::test]
async fn unparseable_answer_keeps_snapshot() {
    let harness = TestHarness::new(
        TestDependencies::new()
            .mock_scraper(MockWebScraper::new().with_page(&page(OPENED)))
            .mock_ai(MockAI::new().with_response(r#"{"available": "maybe", "explanation": "?"}"#)),
    );
    harness.seed_snapshot(BASELINE).await;

    let err = harness.checker.run_once().await.unwrap_err();

    assert!(matches!(err, CheckError::ResponseParse(_)));
    assert_eq!(harness.snapshot().await.as_deref(), Some(BASELINE));
    assert!(harness.deps.notifier.sent().is_empty());
}

#[tokio::test]
async fn page_change_between_runs_is_classified_once() {
    let harness = TestHarness::new(
        TestDependencies::new()
            .mock_scraper(MockWebScraper::new().with_page(&page(BASELINE)))
            .mock_ai(MockAI::new().with_response(
                r#"{"available": true, "explanation": "A Tuesday slot opened."}"#,
            )),
    );

    assert_eq!(harness.checker.run_once().await.unwrap(), RunOutcome::Bootstrapped);

    harness.deps.scraper.set_page(&page(OPENED));
    assert!(matches!(
        harness.checker.run_once().await.unwrap(),
        RunOutcome::Available { .. }
    ));
    assert_eq!(harness.checker.run_once().await.unwrap(), RunOutcome::Unchanged);

    assert_eq!(harness.deps.ai.call_count(), 1);
    assert_eq!(harness.deps.notifier.sent().len(), 1);
}
