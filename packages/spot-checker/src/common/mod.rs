pub mod error;

pub use error::{CheckError, ResponseParseError};
