//! High-precision pattern detectors
//!
//! Agreement, instruction, review and greeting texts carry surface markers
//! precise enough to classify them without keyword scoring. Detectors run in a
//! fixed order before the scorer and the first hit ends classification.
//!
//! English alternations are anchored at a word start so that, for example,
//! "this" does not count as the greeting "hi". CJK terms match anywhere.

use crate::classifier::{ClassificationResult, ScenarioLabel};
use regex::Regex;
use replykit_core::{fingerprint, Result};
use tracing::debug;

/// Texts at least this many characters long are never treated as greetings
pub const DEFAULT_GREETING_MAX_CHARS: usize = 100;

/// A short-circuit rule evaluated before keyword scoring
pub trait Detector: Send + Sync {
    /// Detector name, for logs
    fn name(&self) -> &str;

    /// Return a final result if the text matches this detector
    fn try_match(&self, text: &str) -> Option<ClassificationResult>;
}

/// Compile a case-insensitive alternation of English terms and CJK terms.
///
/// English terms are escaped except for runs of spaces, which accept any
/// whitespace. `whole_word` also anchors the end of English terms.
pub(crate) fn term_regex(english: &[&str], cjk: &[&str], whole_word: bool) -> Result<Regex> {
    let english: Vec<String> = english
        .iter()
        .map(|term| {
            term.split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .collect();
    let tail = if whole_word { r"\b" } else { "" };

    let mut alternatives = Vec::with_capacity(cjk.len() + 1);
    if !english.is_empty() {
        alternatives.push(format!(r"\b(?:{}){}", english.join("|"), tail));
    }
    alternatives.extend(cjk.iter().map(|term| regex::escape(term)));

    let pattern = format!("(?i){}", alternatives.join("|"));
    Regex::new(&pattern).map_err(|e| {
        replykit_core::Error::classifier(format!("Failed to compile pattern '{}': {}", pattern, e))
    })
}

/// Agreement, policy and terms-of-service text
pub struct AgreementDetector {
    pattern: Regex,
}

impl AgreementDetector {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: term_regex(
                &["agreement", "policy", "terms"],
                &["条款", "协议", "政策", "承诺", "保证"],
                false,
            )?,
        })
    }
}

impl Detector for AgreementDetector {
    fn name(&self) -> &str {
        "agreement"
    }

    fn try_match(&self, text: &str) -> Option<ClassificationResult> {
        self.pattern.is_match(text).then(|| {
            ClassificationResult::new(ScenarioLabel::Agreement, 0.90, fingerprint(text))
                .with_keywords(["agreement", "policy", "terms"])
        })
    }
}

/// Guides, tutorials and manuals
pub struct InstructionDetector {
    pattern: Regex,
}

impl InstructionDetector {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: term_regex(
                &["instruction", "guide", "tutorial", "manual", "how to", "step by step"],
                &["步骤", "指南", "教程", "说明书", "使用说明"],
                false,
            )?,
        })
    }
}

impl Detector for InstructionDetector {
    fn name(&self) -> &str {
        "instruction"
    }

    fn try_match(&self, text: &str) -> Option<ClassificationResult> {
        self.pattern.is_match(text).then(|| {
            ClassificationResult::new(ScenarioLabel::Instruction, 0.85, fingerprint(text))
                .with_keywords(["guide", "tutorial", "instruction"])
        })
    }
}

/// Reviews and ratings, split by polarity
///
/// A positive marker wins over a negative one; a review with neither is
/// reported as a neutral `review`.
pub struct ReviewDetector {
    pattern: Regex,
    positive: Regex,
    negative: Regex,
}

impl ReviewDetector {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: term_regex(
                &["review", "recommend", "rating"],
                &["评价", "评论", "推荐", "评分", "点评"],
                false,
            )?,
            positive: term_regex(
                &["good", "great", "excellent", "awesome", "love", "like", "recommend"],
                &["喜欢", "推荐", "好", "棒", "赞"],
                false,
            )?,
            negative: term_regex(
                &["bad", "terrible", "awful", "disappointed", "hate", "dislike"],
                &["不好", "差", "垃圾", "失望", "讨厌"],
                false,
            )?,
        })
    }
}

impl Detector for ReviewDetector {
    fn name(&self) -> &str {
        "review"
    }

    fn try_match(&self, text: &str) -> Option<ClassificationResult> {
        if !self.pattern.is_match(text) {
            return None;
        }

        let hash = fingerprint(text);
        let result = if self.positive.is_match(text) {
            ClassificationResult::new(ScenarioLabel::Compliment, 0.80, hash)
                .with_keywords(["review", "recommend", "good"])
        } else if self.negative.is_match(text) {
            ClassificationResult::new(ScenarioLabel::Complaint, 0.80, hash)
                .with_keywords(["review", "bad", "disappointed"])
        } else {
            ClassificationResult::new(ScenarioLabel::Review, 0.70, hash)
                .with_keywords(["review", "rating"])
        };
        Some(result)
    }
}

/// Short greetings
pub struct GreetingDetector {
    pattern: Regex,
    max_chars: usize,
}

impl GreetingDetector {
    pub fn new() -> Result<Self> {
        Self::with_max_chars(DEFAULT_GREETING_MAX_CHARS)
    }

    /// Only texts shorter than `max_chars` characters can be greetings
    pub fn with_max_chars(max_chars: usize) -> Result<Self> {
        Ok(Self {
            pattern: term_regex(
                &[
                    "hi",
                    "hello",
                    "hey",
                    "greetings",
                    "good morning",
                    "good afternoon",
                    "good evening",
                    "morning",
                    "afternoon",
                    "evening",
                ],
                &["你好", "早上好", "下午好", "晚上好", "问候", "嗨", "哈喽"],
                true,
            )?,
            max_chars,
        })
    }
}

impl Detector for GreetingDetector {
    fn name(&self) -> &str {
        "greeting"
    }

    fn try_match(&self, text: &str) -> Option<ClassificationResult> {
        if text.chars().count() >= self.max_chars || !self.pattern.is_match(text) {
            return None;
        }
        Some(
            ClassificationResult::new(ScenarioLabel::Greeting, 0.90, fingerprint(text))
                .with_keywords(["hello", "hi", "greetings"]),
        )
    }
}

/// The detectors in evaluation order
pub struct PatternDetectors {
    detectors: Vec<Box<dyn Detector>>,
}

impl PatternDetectors {
    /// Agreement, instruction, review, greeting
    pub fn new(greeting_max_chars: usize) -> Result<Self> {
        Ok(Self {
            detectors: vec![
                Box::new(AgreementDetector::new()?),
                Box::new(InstructionDetector::new()?),
                Box::new(ReviewDetector::new()?),
                Box::new(GreetingDetector::with_max_chars(greeting_max_chars)?),
            ],
        })
    }

    /// Run detectors in order and return the first hit
    pub fn detect(&self, text: &str) -> Option<ClassificationResult> {
        self.detectors.iter().find_map(|detector| {
            let result = detector.try_match(text)?;
            debug!(
                "Pattern detector '{}' matched: {} ({:.2})",
                detector.name(),
                result.label,
                result.confidence
            );
            Some(result)
        })
    }

    pub fn names(&self) -> Vec<&str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agreement_detector() {
        let detector = AgreementDetector::new().unwrap();

        let result = detector
            .try_match("Please review our Terms and Conditions before proceeding.")
            .unwrap();
        assert_eq!(result.label, ScenarioLabel::Agreement);
        assert_eq!(result.confidence, 0.9);
        assert_eq!(result.matched_keywords, vec!["agreement", "policy", "terms"]);

        assert!(detector.try_match("请阅读用户协议").is_some());
        assert!(detector.try_match("Nice weather today").is_none());
    }

    #[test]
    fn test_instruction_detector() {
        let detector = InstructionDetector::new().unwrap();

        let result = detector.try_match("A step by step guide to baking bread").unwrap();
        assert_eq!(result.label, ScenarioLabel::Instruction);
        assert_eq!(result.confidence, 0.85);

        assert!(detector.try_match("How  to install the driver").is_some());
        assert!(detector.try_match("详细的使用说明").is_some());
        assert!(detector.try_match("How are you?").is_none());
    }

    #[test]
    fn test_review_detector_polarity() {
        let detector = ReviewDetector::new().unwrap();

        let positive = detector.try_match("Great product, five star review").unwrap();
        assert_eq!(positive.label, ScenarioLabel::Compliment);
        assert_eq!(positive.confidence, 0.8);

        let negative = detector.try_match("My review: terrible battery").unwrap();
        assert_eq!(negative.label, ScenarioLabel::Complaint);
        assert_eq!(negative.confidence, 0.8);

        let neutral = detector.try_match("Rating: 3 out of 5").unwrap();
        assert_eq!(neutral.label, ScenarioLabel::Review);
        assert_eq!(neutral.confidence, 0.7);
        assert_eq!(neutral.matched_keywords, vec!["review", "rating"]);
    }

    #[test]
    fn test_review_positive_wins_over_negative() {
        let detector = ReviewDetector::new().unwrap();
        let result = detector.try_match("Review: great screen, awful speakers").unwrap();
        assert_eq!(result.label, ScenarioLabel::Compliment);
    }

    #[test]
    fn test_review_dislike_is_not_like() {
        let detector = ReviewDetector::new().unwrap();
        let result = detector.try_match("I dislike this rating system").unwrap();
        assert_eq!(result.label, ScenarioLabel::Complaint);
    }

    #[test]
    fn test_greeting_detector() {
        let detector = GreetingDetector::new().unwrap();

        let result = detector.try_match("Hello there!").unwrap();
        assert_eq!(result.label, ScenarioLabel::Greeting);
        assert_eq!(result.confidence, 0.9);

        assert!(detector.try_match("Good  morning everyone").is_some());
        assert!(detector.try_match("你好").is_some());
    }

    #[test]
    fn test_bare_time_of_day_greetings() {
        let detector = GreetingDetector::new().unwrap();
        assert!(detector.try_match("Morning everyone!").is_some());
        assert!(detector.try_match("Evening all").is_some());
        assert!(detector.try_match("afternoon!").is_some());
        // Whole words only
        assert!(detector.try_match("Mornings are slow here").is_none());
    }

    #[test]
    fn test_greeting_needs_whole_word() {
        let detector = GreetingDetector::new().unwrap();
        assert!(detector.try_match("Thank you so much, this really helped!").is_none());
        assert!(detector.try_match("They went hiking").is_none());
    }

    #[test]
    fn test_greeting_length_gate() {
        let detector = GreetingDetector::new().unwrap();
        let long = format!("hello {}", "a".repeat(144));
        assert_eq!(long.chars().count(), 150);
        assert!(detector.try_match(&long).is_none());

        let edge = format!("hello {}", "a".repeat(93));
        assert_eq!(edge.chars().count(), 99);
        assert!(detector.try_match(&edge).is_some());
    }

    #[test]
    fn test_detector_order() {
        let detectors = PatternDetectors::new(DEFAULT_GREETING_MAX_CHARS).unwrap();
        assert_eq!(
            detectors.names(),
            vec!["agreement", "instruction", "review", "greeting"]
        );

        // Agreement outranks review even when both match
        let result = detectors.detect("Hi! Please review the privacy policy").unwrap();
        assert_eq!(result.label, ScenarioLabel::Agreement);

        // Instruction outranks greeting
        let result = detectors.detect("Hi, here is the tutorial").unwrap();
        assert_eq!(result.label, ScenarioLabel::Instruction);

        assert!(detectors.detect("The parcel arrived late").is_none());
    }

    #[test]
    fn test_detector_result_carries_fingerprint() {
        let detectors = PatternDetectors::new(DEFAULT_GREETING_MAX_CHARS).unwrap();
        let text = "Hey!";
        let result = detectors.detect(text).unwrap();
        assert_eq!(result.text_hash, fingerprint(text));
        assert!(!result.is_question);
        assert_eq!(result.sentiment, 0.0);
    }
}
