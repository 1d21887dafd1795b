//! Deciding whether a content change means a spot opened up.

use async_trait::async_trait;
use openai_client::strip_code_blocks;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

use crate::common::{CheckError, ResponseParseError};
use crate::kernel::BaseAI;

/// Verdict on one change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub available: bool,
    pub explanation: String,
}

#[async_trait]
pub trait BaseClassifier: Send + Sync {
    /// Compare two different versions of the watched region
    async fn classify(&self, old_content: &str, new_content: &str) -> Result<Classification, CheckError>;
}

// =============================================================================
// Model-backed classifier
// =============================================================================

const PROMPT_TEMPLATE: &str = r#"I'm looking for a spot for a swimming lesson. The school offers individual single lessons and multi-week sessions.
I captured the website's content a while ago and now it is different. Compare the two versions and answer these two questions:
- Is there any spot available (single lesson or weekly session) since the last capture?
- What is newly available, in one short sentence?
Answer with a JSON object in exactly this shape:
{
  "available": <boolean answer to the first question>,
  "explanation": <string answer to the second question>
}
Output only the JSON object, with no extra characters around it, so it can be parsed as is.

Here is the old content:
------------------------
{old}
------------------------

Here is the new content:
------------------------
{new}
------------------------
"#;

/// Prompt embedding both versions of the watched region
pub fn build_prompt(old_content: &str, new_content: &str) -> String {
    // Single pass so page text containing "{new}" is left alone
    PROMPT_TEMPLATE
        .split_once("{old}")
        .and_then(|(head, rest)| {
            rest.split_once("{new}")
                .map(|(middle, tail)| format!("{head}{old_content}{middle}{new_content}{tail}"))
        })
        .unwrap_or_else(|| PROMPT_TEMPLATE.to_string())
}

/// Decode the model's answer into a typed verdict.
///
/// The answer may be wrapped in a markdown fence. Every failure mode is a
/// distinct [`ResponseParseError`].
pub fn parse_classification(raw: &str) -> Result<Classification, ResponseParseError> {
    let body = strip_code_blocks(raw);
    let object: Map<String, Value> =
        serde_json::from_str(body).map_err(|e| ResponseParseError::InvalidJson {
            reason: e.to_string(),
            raw: raw.to_string(),
        })?;

    let available = field(&object, "available")?
        .as_bool()
        .ok_or(ResponseParseError::WrongType {
            field: "available",
            expected: "boolean",
        })?;

    let explanation = field(&object, "explanation")?
        .as_str()
        .ok_or(ResponseParseError::WrongType {
            field: "explanation",
            expected: "string",
        })?
        .to_string();

    Ok(Classification {
        available,
        explanation,
    })
}

fn field<'a>(object: &'a Map<String, Value>, name: &'static str) -> Result<&'a Value, ResponseParseError> {
    object.get(name).ok_or(ResponseParseError::MissingField(name))
}

/// Asks a language model to interpret the change
pub struct LlmClassifier {
    ai: Arc<dyn BaseAI>,
}

impl LlmClassifier {
    pub fn new(ai: Arc<dyn BaseAI>) -> Self {
        Self { ai }
    }
}

#[async_trait]
impl BaseClassifier for LlmClassifier {
    async fn classify(&self, old_content: &str, new_content: &str) -> Result<Classification, CheckError> {
        let prompt = build_prompt(old_content, new_content);

        let raw = self
            .ai
            .complete(&prompt)
            .await
            .map_err(CheckError::ModelCall)?;

        debug!(response = %raw, "Model response");

        Ok(parse_classification(&raw)?)
    }
}

// =============================================================================
// Keyword classifier
// =============================================================================

/// Treats the new content as "no availability" while it still contains any
/// of the configured phrases
pub struct KeywordClassifier {
    /// (as configured, lowercased for matching)
    patterns: Vec<(String, String)>,
}

impl KeywordClassifier {
    pub fn new(patterns: impl IntoIterator<Item = String>) -> Self {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .map(|p| {
                    let lowered = p.to_lowercase();
                    (p, lowered)
                })
                .collect(),
        }
    }

    pub fn check(&self, new_content: &str) -> Classification {
        let haystack = new_content.to_lowercase();

        match self
            .patterns
            .iter()
            .find(|(_, lowered)| haystack.contains(lowered.as_str()))
        {
            Some((pattern, _)) => Classification {
                available: false,
                explanation: format!("Page still says \"{}\"", pattern),
            },
            None => Classification {
                available: true,
                explanation: "The page changed and no longer mentions a lack of availability"
                    .to_string(),
            },
        }
    }
}

#[async_trait]
impl BaseClassifier for KeywordClassifier {
    async fn classify(&self, _old_content: &str, new_content: &str) -> Result<Classification, CheckError> {
        Ok(self.check(new_content))
    }
}
