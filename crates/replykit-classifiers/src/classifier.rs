//! Scenario labels and the classification result handed to callers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Communicative scenario of a piece of selected text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioLabel {
    Compliment,
    Complaint,
    Inquiry,
    Gratitude,
    Greeting,
    Agreement,
    Instruction,
    Review,
    /// Universal fallback when no signal is strong enough
    Other,
}

impl ScenarioLabel {
    /// All labels, in declaration order
    pub const ALL: [ScenarioLabel; 9] = [
        Self::Compliment,
        Self::Complaint,
        Self::Inquiry,
        Self::Gratitude,
        Self::Greeting,
        Self::Agreement,
        Self::Instruction,
        Self::Review,
        Self::Other,
    ];

    /// Wire tag used in lexicon files and serialized results
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compliment => "compliment",
            Self::Complaint => "complaint",
            Self::Inquiry => "inquiry",
            Self::Gratitude => "gratitude",
            Self::Greeting => "greeting",
            Self::Agreement => "agreement",
            Self::Instruction => "instruction",
            Self::Review => "review",
            Self::Other => "other",
        }
    }

    /// Chinese caption shown next to the scenario selector
    pub fn description(&self) -> &'static str {
        match self {
            Self::Compliment => "赞美夸奖",
            Self::Complaint => "投诉抱怨",
            Self::Inquiry => "咨询提问",
            Self::Gratitude => "感谢致谢",
            Self::Greeting => "问候打招呼",
            Self::Agreement => "同意赞同",
            Self::Instruction | Self::Review | Self::Other => "未识别类型",
        }
    }
}

impl fmt::Display for ScenarioLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioLabel {
    type Err = replykit_core::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|label| label.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| replykit_core::Error::classifier(format!("unknown scenario label '{s}'")))
    }
}

/// Result of scenario classification
///
/// Serializes with the field names the extension UI expects
/// (`type`, `isQuestion`, `matchedKeywords`, `textHash`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    /// Winning scenario
    #[serde(rename = "type")]
    pub label: ScenarioLabel,

    /// Confidence (0.0-1.0), rounded to 2 decimals
    pub confidence: f64,

    /// Sentiment scalar, rounded to 1 decimal
    pub sentiment: f64,

    /// Whether the text reads as a question
    pub is_question: bool,

    /// Keywords that contributed to the winning scenario
    pub matched_keywords: Vec<String>,

    /// Fingerprint of the input text
    pub text_hash: String,

    /// Set only when classification failed internally
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ClassificationResult {
    /// Create a result with the given label and confidence and neutral features
    pub fn new(label: ScenarioLabel, confidence: f64, text_hash: impl Into<String>) -> Self {
        Self {
            label,
            confidence: round_to(confidence, 2),
            sentiment: 0.0,
            is_question: false,
            matched_keywords: Vec::new(),
            text_hash: text_hash.into(),
            error: None,
        }
    }

    /// The result for empty input
    pub fn empty() -> Self {
        Self::new(ScenarioLabel::Other, 0.0, replykit_core::fingerprint(""))
    }

    /// The result reported when classification failed internally
    pub fn failed(text_hash: impl Into<String>, error: impl fmt::Display) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::new(ScenarioLabel::Other, 0.0, text_hash)
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.matched_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Round half up to `places` decimals, matching how the UI formats scores.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor + 0.5).floor() / factor
}
