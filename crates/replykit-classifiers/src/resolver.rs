//! Final scenario resolution
//!
//! Starts from the keyword scorer's best label and applies named rules in a
//! fixed order. Each rule sees the decision left by the previous rules and
//! either replaces it or has no opinion:
//!
//! 1. [`QuestionRule`]: question texts become `inquiry`
//! 2. [`GratitudeRule`]: thanks with weak keyword support become `gratitude`
//! 3. [`SentimentFallbackRule`]: without keyword support, sentiment decides
//! 4. [`LowWeightRule`]: anything still weaker than 0.5 is `other`
//!
//! Confidence is the winning weight over the total keyword weight, capped at 1.

use crate::classifier::{round_to, ScenarioLabel};
use crate::scorer::ScoreBoard;
use crate::sentiment::TextFeatures;
use tracing::debug;

/// Minimum weight given to a label chosen by the question or gratitude rule
const OVERRIDE_WEIGHT: f64 = 1.5;
/// Below this weight the keyword signal counts as absent
const MIN_SIGNAL_WEIGHT: f64 = 0.5;

/// Decision in progress
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    /// `None` until some signal picks a label
    pub label: Option<ScenarioLabel>,
    pub weight: f64,
    pub keywords: Vec<String>,
}

impl Decision {
    /// The scorer's best label, or an unresolved decision if nothing matched
    pub fn from_board(board: &ScoreBoard) -> Self {
        match board.best() {
            Some(best) => Self {
                label: Some(best.label),
                weight: best.weight,
                keywords: best.keywords.clone(),
            },
            None => Self {
                label: None,
                weight: 0.0,
                keywords: Vec::new(),
            },
        }
    }

    /// Relabel, keeping the keywords that produced the current weight
    fn switch_to(&self, label: ScenarioLabel, weight: f64) -> Self {
        Self {
            label: Some(label),
            weight,
            keywords: self.keywords.clone(),
        }
    }
}

/// Everything a rule may look at besides the current decision
#[derive(Debug, Clone, Copy)]
pub struct ResolverInput<'a> {
    pub board: &'a ScoreBoard,
    pub features: &'a TextFeatures,
}

/// One step of the resolution pipeline
pub trait ResolverRule: Send + Sync {
    fn name(&self) -> &'static str;

    /// Return a replacement decision, or `None` for no opinion
    fn apply(&self, decision: &Decision, input: &ResolverInput<'_>) -> Option<Decision>;
}

/// Promote question texts to `inquiry`.
///
/// Fires when the text is a question, the current label is not already
/// `inquiry`, and either the keyword signal is weak (< 1), the question is
/// emphatic (strength ≥ 2), or inquiry keywords score above 60% of the leader.
pub struct QuestionRule;

impl ResolverRule for QuestionRule {
    fn name(&self) -> &'static str {
        "question"
    }

    fn apply(&self, decision: &Decision, input: &ResolverInput<'_>) -> Option<Decision> {
        let features = input.features;
        if !features.is_question() || decision.label == Some(ScenarioLabel::Inquiry) {
            return None;
        }

        let inquiry_weight = input.board.weight_of(ScenarioLabel::Inquiry);
        let fires = decision.weight < 1.0
            || features.question_strength() >= 2
            || inquiry_weight > decision.weight * 0.6;

        fires.then(|| {
            decision.switch_to(ScenarioLabel::Inquiry, decision.weight.max(OVERRIDE_WEIGHT))
        })
    }
}

/// Promote thanks to `gratitude` unless another label has strong support
pub struct GratitudeRule;

impl ResolverRule for GratitudeRule {
    fn name(&self) -> &'static str {
        "gratitude"
    }

    fn apply(&self, decision: &Decision, input: &ResolverInput<'_>) -> Option<Decision> {
        let fires = input.features.has_gratitude
            && (decision.label.is_none() || decision.weight < OVERRIDE_WEIGHT);

        fires.then(|| {
            decision.switch_to(ScenarioLabel::Gratitude, decision.weight.max(OVERRIDE_WEIGHT))
        })
    }
}

/// Let sentiment and question shape decide when keywords said nothing useful
pub struct SentimentFallbackRule;

impl ResolverRule for SentimentFallbackRule {
    fn name(&self) -> &'static str {
        "sentiment_fallback"
    }

    fn apply(&self, decision: &Decision, input: &ResolverInput<'_>) -> Option<Decision> {
        if decision.label.is_some() && decision.weight >= MIN_SIGNAL_WEIGHT {
            return None;
        }

        let s = input.features.sentiment;
        let (label, weight) = if s > 1.0 {
            (ScenarioLabel::Compliment, decision.weight.max(s))
        } else if s < -1.0 {
            (ScenarioLabel::Complaint, decision.weight.max(s.abs()))
        } else if input.features.is_question() {
            (ScenarioLabel::Inquiry, decision.weight.max(1.0))
        } else if s > 0.0 {
            (ScenarioLabel::Compliment, decision.weight.max(s))
        } else if s < 0.0 {
            (ScenarioLabel::Complaint, decision.weight.max(s.abs()))
        } else {
            return None;
        };

        Some(decision.switch_to(label, weight))
    }
}

/// Demote unresolved or weak decisions to `other`
pub struct LowWeightRule;

impl ResolverRule for LowWeightRule {
    fn name(&self) -> &'static str {
        "low_weight"
    }

    fn apply(&self, decision: &Decision, _input: &ResolverInput<'_>) -> Option<Decision> {
        if decision.label.is_some() && decision.weight >= MIN_SIGNAL_WEIGHT {
            return None;
        }
        if decision.label == Some(ScenarioLabel::Other) {
            return None;
        }
        Some(Decision {
            label: Some(ScenarioLabel::Other),
            ..decision.clone()
        })
    }
}

/// Outcome of resolution
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub label: ScenarioLabel,
    /// Final winning weight, unrounded
    pub weight: f64,
    /// `min(1, weight / total)`, rounded to 2 decimals; 0 when total is 0
    pub confidence: f64,
    pub keywords: Vec<String>,
}

/// Ordered rule pipeline
pub struct Resolver {
    rules: Vec<Box<dyn ResolverRule>>,
}

impl Resolver {
    /// Question, gratitude, sentiment fallback, low weight
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(QuestionRule),
                Box::new(GratitudeRule),
                Box::new(SentimentFallbackRule),
                Box::new(LowWeightRule),
            ],
        }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn resolve(&self, board: &ScoreBoard, features: &TextFeatures) -> Resolution {
        let input = ResolverInput { board, features };

        let mut decision = Decision::from_board(board);
        for rule in &self.rules {
            if let Some(next) = rule.apply(&decision, &input) {
                debug!(
                    "Resolver rule '{}' changed {:?} ({:.2}) to {:?} ({:.2})",
                    rule.name(),
                    decision.label,
                    decision.weight,
                    next.label,
                    next.weight
                );
                decision = next;
            }
        }

        let total = board.total_weight();
        let confidence = if total > 0.0 {
            (decision.weight / total).min(1.0)
        } else {
            0.0
        };

        Resolution {
            label: decision.label.unwrap_or(ScenarioLabel::Other),
            weight: decision.weight,
            confidence: round_to(confidence, 2),
            keywords: decision.keywords,
        }
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::Lexicon;
    use crate::scorer::KeywordScorer;

    fn board(entries: Vec<(ScenarioLabel, Vec<&str>)>, text: &str) -> ScoreBoard {
        KeywordScorer::new()
            .score(&Lexicon::new(entries), text)
            .unwrap()
    }

    fn features(sentiment: f64) -> TextFeatures {
        TextFeatures {
            sentiment,
            ..Default::default()
        }
    }

    fn question(marks: usize, keywords: bool) -> TextFeatures {
        TextFeatures {
            question_marks: marks,
            has_question_keywords: keywords,
            ..Default::default()
        }
    }

    #[test]
    fn test_rule_order() {
        assert_eq!(
            Resolver::new().rule_names(),
            vec!["question", "gratitude", "sentiment_fallback", "low_weight"]
        );
    }

    #[test]
    fn test_keyword_winner_stands() {
        let board = board(vec![(ScenarioLabel::Complaint, vec!["refund"])], "refund");
        let resolution = Resolver::new().resolve(&board, &features(0.0));
        assert_eq!(resolution.label, ScenarioLabel::Complaint);
        assert_eq!(resolution.confidence, 1.0);
        assert_eq!(resolution.keywords, vec!["refund"]);
    }

    #[test]
    fn test_question_overrides_weak_signal() {
        let board = ScoreBoard::default();
        let resolution = Resolver::new().resolve(&board, &question(1, false));
        assert_eq!(resolution.label, ScenarioLabel::Inquiry);
        assert_eq!(resolution.weight, 1.5);
        // No keyword weight at all
        assert_eq!(resolution.confidence, 0.0);
    }

    #[test]
    fn test_single_question_mark_keeps_strong_winner() {
        // refund: 2.0 * 1.5 = 3.0, well above 1 and no inquiry support
        let board = board(
            vec![
                (ScenarioLabel::Complaint, vec!["refund"]),
                (ScenarioLabel::Inquiry, vec!["status"]),
            ],
            "refund?",
        );
        let resolution = Resolver::new().resolve(&board, &question(1, false));
        assert_eq!(resolution.label, ScenarioLabel::Complaint);
    }

    #[test]
    fn test_emphatic_question_overrides_strong_winner() {
        let board = board(vec![(ScenarioLabel::Complaint, vec!["refund"])], "refund??");
        let resolution = Resolver::new().resolve(&board, &question(2, false));
        assert_eq!(resolution.label, ScenarioLabel::Inquiry);
        assert_eq!(resolution.weight, 3.0);
        assert_eq!(resolution.confidence, 1.0);
        assert_eq!(resolution.keywords, vec!["refund"]);
    }

    #[test]
    fn test_question_with_inquiry_support_overrides() {
        // complaint "refund" 3.0, inquiry "status" 2.0 > 0.6 * 3.0
        let board = board(
            vec![
                (ScenarioLabel::Complaint, vec!["refund"]),
                (ScenarioLabel::Inquiry, vec!["status"]),
            ],
            "refund status?",
        );
        let resolution = Resolver::new().resolve(&board, &question(1, false));
        assert_eq!(resolution.label, ScenarioLabel::Inquiry);
        assert_eq!(resolution.weight, 3.0);
        assert_eq!(resolution.confidence, 0.6);
        // Keywords stay with the keyword winner
        assert_eq!(resolution.keywords, vec!["refund"]);
    }

    #[test]
    fn test_existing_inquiry_is_not_boosted() {
        // "ask" weighs 1.0 * 1.5 = 1.5
        let board = board(vec![(ScenarioLabel::Inquiry, vec!["ask"])], "ask me anything?");
        let resolution = Resolver::new().resolve(&board, &question(2, false));
        assert_eq!(resolution.label, ScenarioLabel::Inquiry);
        assert_eq!(resolution.weight, 1.5);
    }

    #[test]
    fn test_gratitude_overrides_weak_winner() {
        // "nice" sits past the first third and weighs 4/3, below 1.5
        let board = board(vec![(ScenarioLabel::Compliment, vec!["nice"])], "thanks, nice");
        let features = TextFeatures {
            has_gratitude: true,
            ..Default::default()
        };
        let resolution = Resolver::new().resolve(&board, &features);
        assert_eq!(resolution.label, ScenarioLabel::Gratitude);
        assert_eq!(resolution.weight, 1.5);
        assert_eq!(resolution.keywords, vec!["nice"]);
    }

    #[test]
    fn test_gratitude_yields_to_strong_winner() {
        let board = board(vec![(ScenarioLabel::Complaint, vec!["refund"])], "refund, thanks");
        let features = TextFeatures {
            has_gratitude: true,
            ..Default::default()
        };
        let resolution = Resolver::new().resolve(&board, &features);
        assert_eq!(resolution.label, ScenarioLabel::Complaint);
    }

    #[test]
    fn test_sentiment_fallback_branches() {
        let resolver = Resolver::new();
        let empty = ScoreBoard::default();

        let strong_positive = resolver.resolve(&empty, &features(2.0));
        assert_eq!(strong_positive.label, ScenarioLabel::Compliment);
        assert_eq!(strong_positive.weight, 2.0);

        let strong_negative = resolver.resolve(&empty, &features(-2.0));
        assert_eq!(strong_negative.label, ScenarioLabel::Complaint);
        assert_eq!(strong_negative.weight, 2.0);

        let weak_positive = resolver.resolve(&empty, &features(1.0));
        assert_eq!(weak_positive.label, ScenarioLabel::Compliment);

        let weak_negative = resolver.resolve(&empty, &features(-1.0));
        assert_eq!(weak_negative.label, ScenarioLabel::Complaint);
    }

    #[test]
    fn test_strong_sentiment_outranks_question_in_fallback() {
        let resolver = Resolver::new();
        let empty = ScoreBoard::default();
        let features = TextFeatures {
            sentiment: -2.0,
            has_question_keywords: true,
            ..Default::default()
        };
        // The question rule fires first since the keyword weight is 0
        assert_eq!(resolver.resolve(&empty, &features).label, ScenarioLabel::Inquiry);

        // In isolation the fallback prefers strong sentiment over the question
        let decision = Decision::from_board(&empty);
        let input = ResolverInput {
            board: &empty,
            features: &features,
        };
        let next = SentimentFallbackRule.apply(&decision, &input).unwrap();
        assert_eq!(next.label, Some(ScenarioLabel::Complaint));
    }

    #[test]
    fn test_faint_sentiment_becomes_other() {
        // One emoji: sentiment 0.3 picks compliment with weight 0.3, then the gate
        let resolution = Resolver::new().resolve(&ScoreBoard::default(), &features(0.3));
        assert_eq!(resolution.label, ScenarioLabel::Other);
        assert_eq!(resolution.confidence, 0.0);
    }

    #[test]
    fn test_no_signal_is_other_with_zero_confidence() {
        let resolution = Resolver::new().resolve(&ScoreBoard::default(), &features(0.0));
        assert_eq!(resolution.label, ScenarioLabel::Other);
        assert_eq!(resolution.weight, 0.0);
        assert_eq!(resolution.confidence, 0.0);
        assert!(resolution.keywords.is_empty());
    }

    #[test]
    fn test_low_weight_other_keeps_formula_confidence() {
        // "赞" weighs 1/3 (late position), sentiment 0 leaves the weak winner alone
        let board = board(vec![(ScenarioLabel::Compliment, vec!["赞"])], "今天天气赞");
        let resolution = Resolver::new().resolve(&board, &features(0.0));
        assert_eq!(resolution.label, ScenarioLabel::Other);
        assert_eq!(resolution.confidence, 1.0);
    }
}
