use crate::common::CheckError;

/// Narrows page text to the region between two marker phrases
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    start_marker: String,
    end_marker: String,
}

impl ContentExtractor {
    pub fn new(start_marker: impl Into<String>, end_marker: impl Into<String>) -> Self {
        Self {
            start_marker: start_marker.into(),
            end_marker: end_marker.into(),
        }
    }

    /// Text strictly between the first start marker and the first end marker
    /// that follows it, trimmed.
    ///
    /// A missing marker means the page layout changed; the caller must not
    /// overwrite the stored snapshot in that case.
    pub fn extract(&self, page: &str) -> Result<String, CheckError> {
        let start = page
            .find(&self.start_marker)
            .ok_or_else(|| self.not_found(&self.start_marker))?
            + self.start_marker.len();

        let end = page[start..]
            .find(&self.end_marker)
            .ok_or_else(|| self.not_found(&self.end_marker))?
            + start;

        Ok(page[start..end].trim().to_string())
    }

    fn not_found(&self, marker: &str) -> CheckError {
        CheckError::MarkerNotFound {
            marker: marker.to_string(),
        }
    }
}
