//! Weighted keyword scoring
//!
//! Every lexicon keyword found in the lower-cased text contributes
//! `length_weight * occurrences * position_weight` to its label, where
//! `length_weight = min(chars / 3, 2)` and `position_weight` is 1.5 when the
//! first occurrence starts in the first third of the text, 1.0 otherwise.
//! Occurrences are counted with overlaps.

use crate::classifier::ScenarioLabel;
use crate::lexicon::{Lexicon, LexiconEntry};
use aho_corasick::AhoCorasick;
use replykit_core::{Error, Result};
use tracing::debug;

const EARLY_POSITION_WEIGHT: f64 = 1.5;
const LATE_POSITION_WEIGHT: f64 = 1.0;
const MAX_LENGTH_WEIGHT: f64 = 2.0;

/// Accumulated score for one label
#[derive(Debug, Clone, PartialEq)]
pub struct LabelScore {
    pub label: ScenarioLabel,
    /// Total keyword occurrences
    pub count: usize,
    pub weight: f64,
    /// Keywords that occurred at least once, in lexicon order
    pub keywords: Vec<String>,
}

/// Per-label scores in lexicon order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreBoard {
    scores: Vec<LabelScore>,
}

impl ScoreBoard {
    pub fn scores(&self) -> &[LabelScore] {
        &self.scores
    }

    pub fn get(&self, label: ScenarioLabel) -> Option<&LabelScore> {
        self.scores.iter().find(|s| s.label == label)
    }

    /// Weight for `label`, zero if it is absent from the lexicon
    pub fn weight_of(&self, label: ScenarioLabel) -> f64 {
        self.get(label).map_or(0.0, |s| s.weight)
    }

    pub fn total_weight(&self) -> f64 {
        self.scores.iter().map(|s| s.weight).sum()
    }

    /// Label with the highest positive weight; the earliest label wins ties
    pub fn best(&self) -> Option<&LabelScore> {
        let mut best: Option<&LabelScore> = None;
        for score in &self.scores {
            if score.weight > best.map_or(0.0, |b| b.weight) {
                best = Some(score);
            }
        }
        best
    }
}

/// Scores text against every label of a lexicon
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordScorer;

impl KeywordScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score `text` against `lexicon`.
    ///
    /// Fails when the lexicon is malformed (an empty keyword, or keywords
    /// that cannot be compiled into a matcher).
    pub fn score(&self, lexicon: &Lexicon, text: &str) -> Result<ScoreBoard> {
        let normalized = text.to_lowercase();
        let text_chars = normalized.chars().count() as f64;

        let scores = lexicon
            .iter()
            .map(|entry| Self::score_entry(entry, &normalized, text_chars))
            .collect::<Result<Vec<_>>>()?;

        Ok(ScoreBoard { scores })
    }

    fn score_entry(entry: &LexiconEntry, normalized: &str, text_chars: f64) -> Result<LabelScore> {
        if let Some(position) = entry.keywords.iter().position(|k| k.is_empty()) {
            return Err(Error::classifier(format!(
                "empty keyword at position {} for label '{}'",
                position, entry.label
            )));
        }

        let mut score = LabelScore {
            label: entry.label,
            count: 0,
            weight: 0.0,
            keywords: Vec::new(),
        };
        if entry.keywords.is_empty() {
            return Ok(score);
        }

        let matcher = AhoCorasick::new(&entry.keywords).map_err(|e| {
            Error::classifier(format!(
                "Failed to build keyword matcher for '{}': {}",
                entry.label, e
            ))
        })?;

        // (occurrences, byte offset of first occurrence) per keyword
        let mut hits: Vec<(usize, usize)> = vec![(0, usize::MAX); entry.keywords.len()];
        for m in matcher.find_overlapping_iter(normalized) {
            let hit = &mut hits[m.pattern().as_usize()];
            hit.0 += 1;
            hit.1 = hit.1.min(m.start());
        }

        for (keyword, &(occurrences, first)) in entry.keywords.iter().zip(&hits) {
            if occurrences == 0 {
                continue;
            }

            let first_char = normalized[..first].chars().count() as f64;
            let position_weight = if first_char < text_chars / 3.0 {
                EARLY_POSITION_WEIGHT
            } else {
                LATE_POSITION_WEIGHT
            };
            let length_weight = (keyword.chars().count() as f64 / 3.0).min(MAX_LENGTH_WEIGHT);
            let contribution = length_weight * occurrences as f64 * position_weight;

            debug!(
                "Keyword '{}' matched {} time(s) for '{}': position weight {:.2}, contribution {:.2}",
                keyword, occurrences, entry.label, position_weight, contribution
            );

            score.count += occurrences;
            score.weight += contribution;
            score.keywords.push(keyword.clone());
        }

        Ok(score)
    }
}
