//! Kernel module - infrastructure and dependency wiring.

pub mod ai;
pub mod deps;
pub mod scheduled_tasks;
pub mod simple_scraper;
pub mod test_dependencies;
pub mod traits;

pub use ai::OpenAIModel;
pub use deps::{NotificationTarget, SpotCheckerDeps};
pub use scheduled_tasks::{normalize_cron, spot_check_job, start_scheduler};
pub use simple_scraper::SimpleScraper;
pub use test_dependencies::TestDependencies;
pub use traits::*;
