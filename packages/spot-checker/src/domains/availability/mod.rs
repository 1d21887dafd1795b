//! Availability domain - extract → diff → classify → notify.

pub mod checker;
pub mod classifier;
pub mod extractor;
pub mod snapshot;

pub use checker::{run_and_log, RunOutcome, SpotChecker};
pub use classifier::{
    build_prompt, parse_classification, BaseClassifier, Classification, KeywordClassifier,
    LlmClassifier,
};
pub use extractor::ContentExtractor;
pub use snapshot::SnapshotStore;
