//! Shared harness for pipeline integration tests.

#![allow(dead_code)]

use spot_checker::config::CheckerSettings;
use spot_checker::domains::availability::SpotChecker;
use spot_checker::kernel::TestDependencies;
use tempfile::TempDir;

pub const START: &str = "Welcome to Anderson’s Swim School";
pub const END: &str = "Average email response time";

/// Wrap region content in a page that carries both markers
pub fn page(content: &str) -> String {
    format!(
        "Home Lessons Contact\n{}\n  {}  \n{}: 24 hours\nCopyright",
        START, content, END
    )
}

/// A checker over mocks with its own temporary snapshot directory
pub struct TestHarness {
    pub deps: TestDependencies,
    pub checker: SpotChecker,
    pub dir: TempDir,
}

impl TestHarness {
    pub fn new(deps: TestDependencies) -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let settings = CheckerSettings {
            url: "https://andersonswim.com/".to_string(),
            start_marker: START.to_string(),
            end_marker: END.to_string(),
            snapshot_path: dir.path().join("previous_content"),
        };
        let checker = SpotChecker::new(settings, deps.deps());
        Self { deps, checker, dir }
    }

    pub async fn snapshot(&self) -> Option<String> {
        self.checker.snapshots().load().await.expect("snapshot load")
    }

    pub async fn seed_snapshot(&self, content: &str) {
        self.checker
            .snapshots()
            .store(content)
            .await
            .expect("snapshot store");
    }
}
