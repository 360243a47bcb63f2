//! Lexicon-based sentiment and question features
//!
//! Produces the bounded sentiment scalar and the question/gratitude signals
//! the resolver combines with keyword scores. English terms match whole words,
//! CJK terms match as substrings.

use crate::patterns::term_regex;
use regex::Regex;
use replykit_core::Result;
use tracing::debug;

const STRONG_WEIGHT: f64 = 1.5;
const WEAK_WEIGHT: f64 = 1.0;
const EXCLAMATION_BOOST: f64 = 0.5;
const EMOJI_WEIGHT: f64 = 0.3;

const POSITIVE_EMOJI: &[char] = &['😀', '😁', '😊', '🙂', '😍', '👍', '👏', '💯', '🎉', '🌟', '✨'];
const NEGATIVE_EMOJI: &[char] = &['😠', '😡', '😢', '😭', '😞', '👎', '💔'];

/// Signals extracted from one text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextFeatures {
    /// Unrounded sentiment, typically within [-3, 3]
    pub sentiment: f64,
    /// `!` and `！`
    pub exclamations: usize,
    /// `?` and `？`
    pub question_marks: usize,
    pub has_question_keywords: bool,
    pub has_gratitude: bool,
    pub positive_emoji: usize,
    pub negative_emoji: usize,
}

impl TextFeatures {
    pub fn is_question(&self) -> bool {
        self.question_marks > 0 || self.has_question_keywords
    }

    /// Question marks plus one when an interrogative word is present
    pub fn question_strength(&self) -> usize {
        self.question_marks + usize::from(self.has_question_keywords)
    }
}

/// Extracts [`TextFeatures`] from raw text
pub struct FeatureExtractor {
    strong_positive: Regex,
    weak_positive: Regex,
    strong_negative: Regex,
    weak_negative: Regex,
    interrogative: Regex,
    gratitude: Regex,
}

impl FeatureExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            strong_positive: term_regex(
                &["amazing", "excellent", "awesome", "great", "love", "wonderful"],
                &["好", "棒", "喜欢", "赞", "优秀", "满意"],
                true,
            )?,
            weak_positive: term_regex(
                &["good", "nice", "pleased", "happy", "glad"],
                &["不错", "可以"],
                true,
            )?,
            strong_negative: term_regex(
                &["terrible", "horrible", "awful", "worst", "garbage"],
                &["垃圾", "烂", "废物", "差劲", "极差"],
                true,
            )?,
            weak_negative: term_regex(
                &["bad", "disappointing", "poor", "worse"],
                &["不好", "一般", "差", "不满", "失望"],
                true,
            )?,
            interrogative: term_regex(
                &["what", "how", "when", "where", "why", "who", "which"],
                &["吗", "怎么", "如何", "什么", "为什么", "哪里"],
                true,
            )?,
            gratitude: term_regex(
                &["thank", "thanks", "appreciate", "grateful", "thankful", "gracias"],
                &["谢谢", "感谢", "多谢", "非常感谢"],
                true,
            )?,
        })
    }

    pub fn extract(&self, text: &str) -> TextFeatures {
        let mut features = TextFeatures::default();
        for c in text.chars() {
            match c {
                '!' | '！' => features.exclamations += 1,
                '?' | '？' => features.question_marks += 1,
                c if POSITIVE_EMOJI.contains(&c) => features.positive_emoji += 1,
                c if NEGATIVE_EMOJI.contains(&c) => features.negative_emoji += 1,
                _ => {}
            }
        }

        let mut sentiment = 0.0;
        if self.strong_positive.is_match(text) {
            sentiment += STRONG_WEIGHT;
        } else if self.weak_positive.is_match(text) {
            sentiment += WEAK_WEIGHT;
        }
        if self.strong_negative.is_match(text) {
            sentiment -= STRONG_WEIGHT;
        } else if self.weak_negative.is_match(text) {
            sentiment -= WEAK_WEIGHT;
        }

        // Repeated exclamation pushes an existing polarity further out
        if features.exclamations >= 2 {
            if sentiment > 0.0 {
                sentiment += EXCLAMATION_BOOST;
            } else if sentiment < 0.0 {
                sentiment -= EXCLAMATION_BOOST;
            }
        }

        sentiment += features.positive_emoji as f64 * EMOJI_WEIGHT;
        sentiment -= features.negative_emoji as f64 * EMOJI_WEIGHT;
        features.sentiment = sentiment;

        features.has_question_keywords = self.interrogative.is_match(text);
        features.has_gratitude = self.gratitude.is_match(text);

        debug!(
            "Features: sentiment {:.2}, exclamations {}, emoji +{}/-{}, question marks {}, interrogative {}, gratitude {}",
            features.sentiment,
            features.exclamations,
            features.positive_emoji,
            features.negative_emoji,
            features.question_marks,
            features.has_question_keywords,
            features.has_gratitude
        );

        features
    }
}
