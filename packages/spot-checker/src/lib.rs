// Swim Spot Checker - Core
//
// Watches one page, extracts the region between two markers, and when that
// region changes asks a language model whether a lesson spot opened up.
// Positive answers are pushed to a single recipient by SMS or email.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;

pub use common::{CheckError, ResponseParseError};
pub use config::*;
